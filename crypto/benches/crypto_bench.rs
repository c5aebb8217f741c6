use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn legacy_sign_bench(c: &mut Criterion) {
    let kp = patriot_crypto::legacy_keypair_from_seed(&[42u8; 32]);
    let msg = [42u8; 128];

    c.bench_function("legacy_sign_128B", |b| {
        b.iter(|| patriot_crypto::sign_legacy(black_box(&msg), &kp.secret))
    });
}

fn legacy_verify_bench(c: &mut Criterion) {
    let kp = patriot_crypto::legacy_keypair_from_seed(&[42u8; 32]);
    let id = patriot_crypto::key_id(&kp.public);
    let msg = [42u8; 128];
    let sig = patriot_crypto::sign_legacy(&msg, &kp.secret);

    c.bench_function("legacy_verify_128B", |b| {
        b.iter(|| patriot_crypto::verify_legacy(black_box(&msg), &sig, &id))
    });
}

fn operator_verify_bench(c: &mut Criterion) {
    let kp = patriot_crypto::operator_keypair_from_seed(&[9u8; 32]).unwrap();
    let msg = [7u8; 32];
    let sig = patriot_crypto::sign_operator(&msg, &kp.secret).unwrap();

    c.bench_function("operator_verify_32B", |b| {
        b.iter(|| patriot_crypto::verify_operator(black_box(&msg), &sig, &kp.public))
    });
}

fn vote_hash_bench(c: &mut Criterion) {
    let script = [0x76u8; 25];
    let script_len = 25u32.to_le_bytes();
    let height = 1000u32.to_le_bytes();
    let txid = [0xABu8; 32];
    let index = 1u32.to_le_bytes();
    let parts: [&[u8]; 5] = [&script_len, &script, &height, &txid, &index];

    c.bench_function("vote_hash_blake2b_multi", |b| {
        b.iter(|| patriot_crypto::blake2b_256_multi(black_box(&parts)))
    });
}

fn checksum_1kb_bench(c: &mut Criterion) {
    let data = vec![0xCDu8; 1024];

    c.bench_function("blake2b_256_1KB", |b| {
        b.iter(|| patriot_crypto::blake2b_256(black_box(&data)))
    });
}

criterion_group!(
    benches,
    legacy_sign_bench,
    legacy_verify_bench,
    operator_verify_bench,
    vote_hash_bench,
    checksum_1kb_bench,
);
criterion_main!(benches);
