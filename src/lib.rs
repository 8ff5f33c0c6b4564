pub mod dj;
pub mod mont;
pub mod util;

pub mod examples {
    use std::error::Error;
    use std::thread;
    use std::time::Instant;

    use log::{debug, info};
    use num_bigint::BigInt;
    use rand::Rng;

    use crate::dj::{
        Ciphertext, Decryptor, Encryptor, Evaluator, KeyGenerator, KeyParams, Plaintext, PublicKey,
        SecretKey,
    };

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    pub struct SumMismatch {}

    #[derive(Debug, derive_more::Display, derive_more::Error)]
    pub struct WorkerPanicked {}

    /// Generates a key, then encrypts `num_values` random values on
    /// `num_threads` threads, sums them homomorphically and checks the
    /// decrypted sum.
    pub fn throughput(
        params: &KeyParams,
        num_threads: usize,
        num_values: usize,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let now = Instant::now();
        let (sk, pk) = KeyGenerator::generate_with_params(&mut rand::thread_rng(), params)?;
        println!(
            "generated {}-bit key with s={} in {} ms",
            params.key_bits,
            params.s,
            now.elapsed().as_millis()
        );

        let mut rng = rand::thread_rng();
        let values: Vec<i64> = (0..num_values)
            .map(|_| rng.gen_range(-1_000_000_000..1_000_000_000))
            .collect();

        let now = Instant::now();
        let sum = encrypted_sum(&sk, &pk, num_threads, &values)?;
        let elapsed_time = now.elapsed();
        println!(
            "{} encryptions/s (encrypted and summed {} values in {} ms)",
            num_values as f64 * 1_000_000_000f64 / elapsed_time.as_nanos() as f64,
            num_values,
            elapsed_time.as_millis()
        );
        info!("decrypted sum: {}", sum);
        Ok(())
    }

    /// Sums `values` under encryption, splitting the work over `num_threads`
    /// threads that share the same keys.
    pub fn encrypted_sum(
        sk: &SecretKey,
        pk: &PublicKey,
        num_threads: usize,
        values: &[i64],
    ) -> Result<Plaintext, Box<dyn Error + Send + Sync>> {
        let encryptor = Encryptor::new(pk.clone());
        let evaluator = Evaluator::new(pk.clone());
        let decryptor = Decryptor::new(pk.clone(), sk.clone())?;

        let chunk_size = values.len().div_ceil(num_threads.max(1)).max(1);
        let partial_sums = thread::scope(|scope| {
            let handles: Vec<_> = values
                .chunks(chunk_size)
                .map(|chunk| {
                    let encryptor = &encryptor;
                    let evaluator = &evaluator;
                    scope.spawn(move || -> crate::dj::Result<Ciphertext> {
                        let mut acc = encryptor.encrypt_zero()?;
                        for &value in chunk {
                            let ct = encryptor.encrypt(&Plaintext::from(value))?;
                            evaluator.add_inplace(&mut acc, &ct)?;
                        }
                        debug!("worker summed {} values", chunk.len());
                        Ok(acc)
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().map_err(|_| WorkerPanicked {}))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let mut total = encryptor.encrypt_zero()?;
        for partial in partial_sums {
            evaluator.add_inplace(&mut total, &partial?)?;
        }
        let sum = decryptor.decrypt(&total)?;

        let expected: BigInt = values.iter().map(|&v| BigInt::from(v)).sum();
        if sum != Plaintext::new(expected) {
            return Err(Box::new(SumMismatch {}));
        }
        Ok(sum)
    }

}
