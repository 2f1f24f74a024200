use std::hint::black_box;
use std::time::Instant;

use glam::Vec3;
use roamfield_tiles::TileField;

/// A player path that crosses many cells, including negative ones.
fn walk(steps: usize) -> Vec<Vec3> {
    (0..steps)
        .map(|i| {
            let t = i as f32 * 0.37;
            Vec3::new(t.sin() * 500.0 - 250.0, 0.5, t.cos() * 500.0 + i as f32)
        })
        .collect()
}

fn bench_recenter(tiles_per_axis: u32, iterations: usize) {
    let mut field = TileField::new(20.0, tiles_per_axis).expect("valid field");
    let path = walk(iterations);

    let start = Instant::now();
    let mut moves = 0usize;
    for p in &path {
        if field.recenter(black_box(*p)) {
            moves += 1;
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  recenter ({tiles_per_axis}x{tiles_per_axis}, {iterations} iters, {moves} cell changes): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_position_to_tile(iterations: usize) {
    let field = TileField::new(20.0, 3).expect("valid field");
    let path = walk(iterations);

    let start = Instant::now();
    let mut acc = 0i64;
    for p in &path {
        let c = field.position_to_tile(black_box(*p));
        acc += (c.x + c.z) as i64;
    }
    let elapsed = start.elapsed();
    black_box(acc);
    println!("  position_to_tile ({iterations} iters): {:?}/iter", elapsed / iterations as u32);
}

fn main() {
    println!("tile field benchmarks");
    for n in [1, 3, 9, 33] {
        bench_recenter(n, 100_000);
    }
    bench_position_to_tile(1_000_000);
}
