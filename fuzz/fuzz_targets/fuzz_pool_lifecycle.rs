#![no_main]

use libfuzzer_sys::fuzz_target;

use fraccalc_core::FractionPool;

// Each byte is a command: even acquires, odd releases the handle it names.
fuzz_target!(|data: &[u8]| {
    let mut pool = FractionPool::with_buffer_capacity(100, 8).unwrap();
    let mut live = Vec::new();

    for &byte in data {
        if byte % 2 == 0 || live.is_empty() {
            live.push(pool.from_int(i64::from(byte)).unwrap());
        } else {
            let h = live.swap_remove(usize::from(byte) % live.len());
            pool.release(h).unwrap();
            assert!(pool.get(h).is_err());
        }
        assert_eq!(pool.live(), live.len());
    }

    for h in live {
        assert!(pool.to_int(h).is_ok());
    }
    pool.teardown();
});
