use meshbvh::core;
use meshbvh::geom;

use clap::{Parser, ValueEnum};
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rayon::prelude::*;
use std::process;
use std::time::Instant;

const SEED: u64 = 0x5eed;
const SHADOW_EPSILON: f64 = 1e-6;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SplitArg {
    /// Sort triangles by box centroid
    Centroid,
    /// Sort triangles by the extent of their own box
    Extent,
}

impl From<SplitArg> for geom::SplitKey {
    fn from(arg: SplitArg) -> geom::SplitKey {
        match arg {
            SplitArg::Centroid => geom::SplitKey::Centroid,
            SplitArg::Extent => geom::SplitKey::Extent,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bvhtrace")]
#[command(about = "Builds a BVH over a random triangle soup and traces rays through it", long_about = None)]
struct Settings {
    /// Number of random triangles
    #[arg(default_value_t = 100000, value_parser = clap::value_parser!(u32).range(1..))]
    triangles: u32,
    /// Width and height of the primary ray grid
    #[arg(default_value_t = 512, value_parser = clap::value_parser!(u32).range(1..))]
    resolution: u32,
    /// Per-axis ordering used by the builder
    #[arg(value_enum, default_value_t = SplitArg::Centroid)]
    split_key: SplitArg,
}

/// Small random triangles scattered through a slab in front of the camera.
fn random_soup<R: Rng>(rng: &mut R, n: usize) -> (Vec<core::Vec3f>, Vec<geom::Tri>) {
    let mut vertices = Vec::with_capacity(3 * n);
    let mut tris = Vec::with_capacity(n);
    for i in 0..n {
        let center = core::Vec3f::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(10.0..30.0));
        for _ in 0..3 {
            vertices.push(center + core::Vec3f::new(
                rng.gen_range(-0.5..0.5),
                rng.gen_range(-0.5..0.5),
                rng.gen_range(-0.5..0.5)));
        }
        tris.push(geom::Tri::new(3 * i, 3 * i + 1, 3 * i + 2));
    }
    (vertices, tris)
}

pub fn main() {
    env_logger::init();

    let settings = Settings::parse();
    log::info!("Triangles: {}, Resolution: {}, Split key: {:?}",
            settings.triangles, settings.resolution, settings.split_key);

    let mut rng = StdRng::seed_from_u64(SEED);
    let (vertices, tris) = random_soup(&mut rng, settings.triangles as usize);

    let start = Instant::now();
    let options = geom::BuildOptions {split_key: settings.split_key.into()};
    let mesh = match geom::Mesh::with_options(vertices, tris, &options) {
        Ok(mesh) => mesh,
        Err(reason) => {
            eprintln!("Couldn't build BVH: {}", reason);
            process::exit(1);
        }
    };
    println!("Built {} in {:.3} sec: {}", mesh, start.elapsed().as_secs_f64(), mesh.bvh());

    let light = core::Vec3f::new(0.0, 50.0, 0.0);
    let resolution = settings.resolution as usize;
    let last = (resolution - 1).max(1) as f64;

    let start = Instant::now();
    let (hits, shadowed) = (0..resolution * resolution)
        .into_par_iter()
        .map(|i| {
            let (row, col) = (i / resolution, i % resolution);
            let s = col as f64 / last - 0.5;
            let t = row as f64 / last - 0.5;
            let ray = core::Ray::new(core::Vec3f::zero(), core::Vec3f::new(s, t, 1.0));
            match mesh.closest_intersection(&ray, f64::INFINITY) {
                Some(hit) => {
                    let origin = hit.position + hit.normal * SHADOW_EPSILON;
                    let to_light = light - origin;
                    let shadow_ray = core::Ray::new(origin, to_light);
                    let blocked = mesh.any_intersection(&shadow_ray, to_light.magnitude());
                    (1usize, blocked as usize)
                }
                None => (0, 0)
            }
        })
        .reduce(|| (0, 0), |a, b| (a.0 + b.0, a.1 + b.1));
    let secs = start.elapsed().as_secs_f64();

    let rays = resolution * resolution + hits;
    println!("Traced {} rays in {:.3} sec [{:.2} Mrays/sec]: {} hits, {} in shadow",
            rays, secs, rays as f64 / secs * 1e-6, hits, shadowed);
}
