#![no_main]

use libfuzzer_sys::fuzz_target;
use plyio::Reader;

fuzz_target!(|data: &[u8]| {
    // Only panics and crashes are interesting. Errors for invalid files are
    // expected and ignored.
    let mut reader = match Reader::new(data) {
        Ok(r) => r,
        Err(_) => return,
    };

    let names: Vec<_> = reader.header().elements.iter().map(|e| e.name.clone()).collect();
    for name in &names {
        let other = match reader.read_other_element(name) {
            Ok(other) => other,
            Err(_) => return,
        };

        // Decoding the kept data must work for everything that was read.
        for i in 0..other.instances.len() {
            if let Some(res) = other.decode_instance(i) {
                assert!(res.is_ok());
            }
        }
    }
    let _ = reader.close();
});
