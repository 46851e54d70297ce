#![no_main]

use libfuzzer_sys::fuzz_target;

use fraccalc_core::{Fraction, FractionPool};

fn small(bytes: [u8; 2]) -> i64 {
    // Keep products inside i64
    i64::from(i16::from_le_bytes(bytes)) % 10_000
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }
    let an = small([data[0], data[1]]);
    let ad = small([data[2], data[3]]);
    let bn = small([data[4], data[5]]);
    let bd = small([data[6], data[7]]);
    if ad == 0 || bd == 0 {
        return;
    }

    let mut pool = FractionPool::init(10_000).unwrap();
    let a = pool.from_fraction(Fraction::new(an, ad)).unwrap();
    let b = pool.from_fraction(Fraction::new(bn, bd)).unwrap();
    let out = pool.acquire().unwrap();

    pool.sum(out, a, b).unwrap();
    let expected = Fraction::new(an * bd + bn * ad, ad * bd);
    assert!(pool.get(out).unwrap().same_value(&expected));

    pool.mul(out, a, b).unwrap();
    assert!(pool.get(out).unwrap().same_value(&Fraction::new(an * bn, ad * bd)));

    if bn != 0 {
        pool.div(out, a, b).unwrap();
        assert!(pool.get(out).unwrap().same_value(&Fraction::new(an * bd, ad * bn)));
    }
});
