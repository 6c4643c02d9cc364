mod temp_artifact_test;
