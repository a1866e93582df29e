use crossbeam_utils::thread;
use std::ops::Range;

/// compute the cross product of two vectors
pub fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[1] * b[2] - a[2] * b[1],
     a[2] * b[0] - a[0] * b[2],
     a[0] * b[1] - a[1] * b[0]]
}

/// compute the dot product between a vector and a matrix
pub fn dot(v: [f64; 3], m: [[f64; 3]; 3]) -> [f64; 3] {
    let mut out = [0f64; 3];
    for (i, out) in out.iter_mut().enumerate() {
        *out = v[0] * m[0][i] + v[1] * m[1][i] + v[2] * m[2][i]
    }
    out
}

/// compute the dot product between two vectors
pub fn vdot(a: [f64; 3], b: [f64; 3]) -> f64 {
    let mut out = 0f64;
    for i in 0..3 {
        out += a[i] * b[i]
    }
    out
}

/// compute the norm of a vector
pub fn norm(a: [f64; 3]) -> f64 {
    vdot(a, a).sqrt()
}

/// a - b
pub fn subtract(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// a + b
pub fn add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// a * s
pub fn scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

/// calculates the inverse of a 3x3 lattice
pub fn invert_lattice(lattice: &[[f64; 3]; 3])
                      -> Result<[[f64; 3]; 3], String> {
    let minor00 = lattice[1][1] * lattice[2][2] - lattice[1][2] * lattice[2][1];
    let minor01 = lattice[1][0] * lattice[2][2] - lattice[1][2] * lattice[2][0];
    let minor02 = lattice[1][0] * lattice[2][1] - lattice[1][1] * lattice[2][0];
    let determinant = lattice[0][0] * minor00 - lattice[0][1] * minor01
                      + lattice[0][2] * minor02;
    if determinant.abs() < 1e-16 {
        Err(String::from("Lattice doesn't span 3D space"))
    } else {
        Ok([[minor00 / determinant,
             (lattice[0][2] * lattice[2][1] - lattice[2][2] * lattice[0][1])
             / determinant,
             (lattice[0][1] * lattice[1][2] - lattice[1][1] * lattice[0][2])
             / determinant],
            [-minor01 / determinant,
             (lattice[0][0] * lattice[2][2] - lattice[2][0] * lattice[0][2])
             / determinant,
             (lattice[0][2] * lattice[1][0] - lattice[1][2] * lattice[0][0])
             / determinant],
            [minor02 / determinant,
             (lattice[0][1] * lattice[2][0] - lattice[2][1] * lattice[0][0])
             / determinant,
             (lattice[0][0] * lattice[1][1] - lattice[1][0] * lattice[0][1])
             / determinant]])
    }
}

/// The number of threads to use, 0 meaning all available cores.
pub fn thread_count(threads: usize) -> usize {
    match threads {
        0 => num_cpus::get(),
        x => x,
    }
}

/// Maps `f` over `0..len` split into contiguous chunks, one scoped thread per
/// chunk. The chunk results are joined back in index order so the output is
/// independent of the number of threads. The first error in chunk order is
/// returned.
pub fn chunk_map<T, E, F>(len: usize, threads: usize, f: F) -> Result<Vec<T>, E>
    where T: Send,
          E: Send,
          F: Fn(Range<usize>) -> Result<Vec<T>, E> + Sync
{
    let threads = thread_count(threads);
    if threads <= 1 || len < 2 {
        return f(0..len);
    }
    let chunk_size = (len / threads) + (len % threads).min(1);
    let f = &f;
    let chunks = thread::scope(|s| {
        let spawned_threads =
            (0..len).step_by(chunk_size)
                    .map(|start| {
                        let end = (start + chunk_size).min(len);
                        s.spawn(move |_| f(start..end))
                    })
                    .collect::<Vec<_>>();
        spawned_threads.into_iter()
                       .map(|thread| match thread.join() {
                           Ok(result) => result,
                           Err(e) => std::panic::resume_unwind(e),
                       })
                       .collect::<Vec<Result<Vec<T>, E>>>()
    });
    let chunks = match chunks {
        Ok(chunks) => chunks,
        Err(e) => std::panic::resume_unwind(e),
    };
    let mut out = Vec::with_capacity(len);
    for chunk in chunks {
        out.extend(chunk?);
    }
    Ok(out)
}
