use std::hash::BuildHasher;
use std::hash::RandomState;

use clap::Parser;
use robin_hash::Error;
use robin_hash::HashContext;
use robin_hash::Options;
use robin_hash::RobinHoodMap;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 1024)]
    capacity: usize,

    #[arg(short = 't', long = "grow_threshold", default_value_t = 0.75)]
    grow_threshold: f64,

    /// Fill every slot instead of growing at the threshold.
    #[arg(short = 'f', long = "fixed")]
    fixed: bool,
}

fn main() {
    let args = Args::parse();

    let options = Options::default()
        .with_init_capacity(args.capacity.next_power_of_two())
        .with_grow_threshold(args.grow_threshold)
        .with_growable(!args.fixed);
    let hash_builder = RandomState::new();
    let mut map = match RobinHoodMap::with_options_and_context(
        options,
        HashContext::new(hash_builder.clone()),
    ) {
        Ok(map) => map,
        Err(err) => {
            eprintln!("Cannot create map: {err}");
            std::process::exit(1);
        }
    };

    println!("Capacity: {}", map.capacity());
    println!("Grow threshold: {}", map.grow_threshold());
    println!("Filling map with u64 keys...");

    let target = if args.fixed {
        map.capacity()
    } else {
        map.grow_threshold()
    };
    let mut num_overflows = 0;
    for i in 0..target as u64 {
        match map.insert(i, hash_builder.hash_one(i)) {
            Ok(_) => {}
            Err(Error::ProbeDistanceOverflow) => num_overflows += 1,
            Err(err) => {
                eprintln!("Insert of {i} failed: {err}");
                break;
            }
        }
    }

    println!("Inserted {} entries", map.len());
    println!(
        "Final load factor: {:.2}%",
        (map.len() as f64 / map.capacity() as f64) * 100.0
    );
    println!("Max probe distance: {}", map.max_probe_distance());

    let histogram = map.probe_histogram();
    let total: usize = histogram.iter().sum();
    let weighted: usize = histogram
        .iter()
        .enumerate()
        .map(|(distance, count)| distance * count)
        .sum();
    println!(
        "Mean probe distance: {:.3}",
        weighted as f64 / total.max(1) as f64
    );
    println!("Probe distance histogram:");
    for (distance, &count) in histogram.iter().enumerate().filter(|(_, c)| **c > 0) {
        let bar = "#".repeat((count * 60).div_ceil(total.max(1)));
        println!("  {distance:>3}: {count:>8} {bar}");
    }
    println!(
        "Inserts rejected for probe distance: {} ({:.02}%)",
        num_overflows,
        num_overflows as f64 / target.max(1) as f64 * 100.0
    );
}
