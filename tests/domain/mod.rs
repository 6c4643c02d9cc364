mod audio_payload_test;
mod pcm_audio_test;
