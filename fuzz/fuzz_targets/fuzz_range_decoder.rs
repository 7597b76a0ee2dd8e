#![no_main]
use libfuzzer_sys::fuzz_target;
use u3d_stream::decode::RangeDecoder;

fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }

    // First 4 bytes: base context id and number of symbols to decode
    let context = u32::from(u16::from_le_bytes([data[0], data[1]])) % 0x4800;
    let count = u16::from_le_bytes([data[2], data[3]]) % 4096;

    let mut decoder = RangeDecoder::new(&data[4..]);
    for i in 0..u32::from(count) {
        decoder.decode_symbol(context + i % 3);
        let state = decoder.state();
        assert!(state.low <= state.high && state.high <= 0xFFFF);
    }
});
