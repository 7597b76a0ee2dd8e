#![no_main]
use libfuzzer_sys::fuzz_target;
use u3d_stream::{EncodingRsCodec, ParseOptions, U3dDocument};

fuzz_target!(|data: &[u8]| {
    let options = ParseOptions {
        max_blocks: Some(4096),
        ..Default::default()
    };
    let _ = U3dDocument::parse_with(data, &options, &EncodingRsCodec);
});
