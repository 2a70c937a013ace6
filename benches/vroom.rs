use appendix::{AppendMap, MutexMap};
use std::time::{Duration, Instant};

const N: u32 = 1 << 18;

fn report(name: &str, mx: f64, sum: Duration) {
    eprintln!(
        "{} max: {:?}, mean: {:?}",
        name,
        Duration::from_secs_f64(mx),
        sum / N
    );
}

fn main() {
    let mm = MutexMap::new();
    let mut t = Instant::now();
    let mut mx = 0.0f64;
    let mut sum = Duration::new(0, 0);
    for i in 0..N {
        mm.load_or_store(i, i);
        let _ = mm.load(&(i / 2));
        let t2 = Instant::now();
        let took = t2.duration_since(t);
        t = t2;
        mx = mx.max(took.as_secs_f64());
        sum += took;
        println!("{} mutex {} ms", i, took.as_secs_f64() * 1000.0);
    }
    report("appendix::MutexMap", mx, sum);

    let am = AppendMap::new();
    let mut t = Instant::now();
    let mut mx = 0.0f64;
    let mut sum = Duration::new(0, 0);
    for i in 0..N {
        am.load_or_store(i, i);
        let _ = am.load(&(i / 2));
        let t2 = Instant::now();
        let took = t2.duration_since(t);
        t = t2;
        mx = mx.max(took.as_secs_f64());
        sum += took;
        println!("{} append {} ms", i, took.as_secs_f64() * 1000.0);
    }
    report("appendix::AppendMap", mx, sum);

    // Steady state: every key has been promoted, so reads never take the lock.
    let _ = am.snapshot();
    let mut t = Instant::now();
    let mut mx = 0.0f64;
    let mut sum = Duration::new(0, 0);
    for i in 0..N {
        let _ = am.load(&i);
        let t2 = Instant::now();
        let took = t2.duration_since(t);
        t = t2;
        mx = mx.max(took.as_secs_f64());
        sum += took;
    }
    report("appendix::AppendMap (promoted reads)", mx, sum);
}
