use rand::{Rng, SeedableRng};
use voronoi_sweep::{fortune_algorithm, Site};

fn random_sites() {
    let mut rng = rand::rngs::SmallRng::from_seed([76; 32]); // chosen by fair dice roll
    let sites = (0..512)
        .map(|_| Site::new(rng.gen_range(-1 << 20..1 << 20), rng.gen_range(-1 << 20..1 << 20)))
        .collect::<Vec<_>>();

    for _ in 0..100 {
        let vertices = fortune_algorithm(&sites, &mut |_| {}).unwrap_or_default();
        std::hint::black_box(vertices);
    }
}

fn main() {
    let start = std::time::Instant::now();
    random_sites();
    let elapsed = start.elapsed();
    println!("Elapsed: {:?}", elapsed);
}
