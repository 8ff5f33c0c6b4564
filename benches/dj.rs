use criterion::{black_box, Bencher, Criterion};
use djphe::{
    dj::{Ciphertext, Decryptor, Encryptor, Evaluator, KeyGenerator, Plaintext, PublicKey, SecretKey},
    mont::{ModularSpace, MontgomerySpace, PlainSpace},
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const KEY_BITS: usize = 2048;

fn keys(s: u32) -> (SecretKey, PublicKey) {
    let mut rng = ChaCha20Rng::seed_from_u64(s as u64);
    KeyGenerator::generate_with_rng(&mut rng, KEY_BITS, s).unwrap()
}

pub fn criterion_benchmark(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("dj");
    group.sample_size(10);

    for s in [1, 2] {
        let (sk, pk) = keys(s);
        let encryptor = Encryptor::new(pk.clone());
        let decryptor = Decryptor::new(pk.clone(), sk).unwrap();
        let evaluator = Evaluator::new(pk.clone());
        let ct0 = encryptor.encrypt(&Plaintext::from(-12345)).unwrap();
        let ct1 = encryptor.encrypt(&Plaintext::from(123)).unwrap();

        group.bench_function(format!("encrypt_s{}", s), |b| {
            let m = Plaintext::from(i64::MAX);
            b.iter(|| encryptor.encrypt(black_box(&m)).unwrap())
        });

        group.bench_function(format!("decrypt_s{}", s), |b| {
            b.iter(|| decryptor.decrypt(black_box(&ct0)).unwrap())
        });

        group.bench_function(format!("add_s{}", s), |b| {
            b.iter(|| evaluator.add(black_box(&ct0), black_box(&ct1)).unwrap())
        });

        group.bench_function(format!("mul_s{}", s), |b| {
            let k = Plaintext::from(-1_000_003);
            b.iter(|| evaluator.mul(black_box(&ct0), black_box(&k)).unwrap())
        });

        group.bench_function(format!("randomize_s{}", s), |b| {
            let mut ct = ct0.clone();
            b.iter(|| evaluator.randomize(black_box(&mut ct)).unwrap())
        });
    }

    let (_, pk) = keys(1);
    let ct = Encryptor::new(pk.clone()).encrypt(&Plaintext::from(1)).unwrap();

    group.bench_function("serde_serialize_ciphertext", |b| {
        b.iter(|| bincode::serialize(black_box(&ct)))
    });

    group.bench_function("serde_deserialize_ciphertext", |b| {
        let bytes = bincode::serialize(&ct).unwrap();
        b.iter(|| bincode::deserialize::<Ciphertext>(black_box(&bytes)).unwrap())
    });

    group.bench_function("random_hs_r_montgomery", |b| {
        random_hs_r::<MontgomerySpace>(b, &pk)
    });

    group.bench_function("random_hs_r_plain", |b| random_hs_r::<PlainSpace>(b, &pk));

    group.bench_function("mul_mod_montgomery", |b| mul_mod::<MontgomerySpace>(b, &pk));

    group.bench_function("mul_mod_plain", |b| mul_mod::<PlainSpace>(b, &pk));

    group.bench_function("pow_mod_montgomery", |b| pow_mod::<MontgomerySpace>(b, &pk));

    group.bench_function("pow_mod_plain", |b| pow_mod::<PlainSpace>(b, &pk));
}

fn mul_mod<M>(b: &mut Bencher, pk: &PublicKey)
where
    M: ModularSpace,
{
    let space = M::new(pk.cipher_modulus());
    let x = space.map_into(&pk.random_hs_r().unwrap());
    let y = space.map_into(&pk.random_hs_r().unwrap());
    b.iter(|| space.mul_mod(black_box(&x), black_box(&y)))
}

fn pow_mod<M>(b: &mut Bencher, pk: &PublicKey)
where
    M: ModularSpace,
{
    let space = M::new(pk.cipher_modulus());
    let x = space.map_into(&pk.random_hs_r().unwrap());
    let exp = pk.n().clone();
    b.iter(|| space.pow_mod(black_box(&x), black_box(&exp)))
}

fn random_hs_r<M>(b: &mut Bencher, pk: &PublicKey)
where
    M: ModularSpace,
{
    let pk = pk.with_space::<M>().unwrap();
    b.iter(|| pk.random_hs_r().unwrap())
}
