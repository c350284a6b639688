use std::time::Duration;

use rand::{Rng, SeedableRng};
use voronoi_sweep::{fortune_algorithm, Site};

fn random_sites(number: usize) {
    let mut rng = rand::rngs::SmallRng::from_seed([76; 32]); // chosen by fair dice roll
    let sites = (0..number)
        .map(|_| Site::new(rng.gen_range(-1 << 20..1 << 20), rng.gen_range(-1 << 20..1 << 20)))
        .collect::<Vec<_>>();

    for _ in 0..10 {
        let vertices = fortune_algorithm(&sites, &mut |_| {}).unwrap_or_default();
        std::hint::black_box(vertices);
    }
}

/// All sites on a single row, so every new arc lands at the end of the beach line.
fn single_row(number: usize) {
    let sites = (0..number as i32).map(|x| Site::new(x, 0)).collect::<Vec<_>>();

    for _ in 0..10 {
        let vertices = fortune_algorithm(&sites, &mut |_| {}).unwrap_or_default();
        std::hint::black_box(vertices);
    }
}

fn main() {
    let mut n = 1;
    println!(" i |     N |    elapsed | increase ");
    let mut times: Vec<Duration> = Vec::new();
    for i in 0..=14 {
        let start = std::time::Instant::now();
        random_sites(n);
        // single_row(n);
        let elapsed = start.elapsed();
        let increase = times
            .last()
            .map(|t| elapsed.as_secs_f64() / t.as_secs_f64())
            .unwrap_or(f64::NAN);
        println!("{:>2} | {:>5} | {:>10.3?} | {:.2}", i, n, elapsed, increase);

        times.push(elapsed);

        n *= 2;
    }

    let start = std::time::Instant::now();
    single_row(1 << 12);
    println!("single row of {}: {:.3?}", 1 << 12, start.elapsed());
}
