use rayon::prelude::*;

pub fn into_par_iter<T>(v: impl IntoParallelIterator<Item = T>) -> impl ParallelIterator<Item = T> {
    v.into_par_iter()
}

/// Visits four equally long slices slot by slot. Every slot is handed out exactly once, so
/// the writes never alias even though they run on the rayon pool.
pub fn par_iter_mut4<
    T1: Send + Sync,
    T2: Send + Sync,
    T3: Send + Sync,
    T4: Send + Sync,
    F: Fn(usize, &mut T1, &mut T2, &mut T3, &mut T4) + Send + Sync,
>(
    arr1: &mut [T1],
    arr2: &mut [T2],
    arr3: &mut [T3],
    arr4: &mut [T4],
    f: F,
) {
    assert!(arr1.len() == arr2.len() && arr2.len() == arr3.len() && arr3.len() == arr4.len());
    arr1.into_par_iter()
        .zip(arr2.into_par_iter())
        .zip(arr3.into_par_iter())
        .zip(arr4.into_par_iter())
        .enumerate()
        .for_each(|(idx, (((v1, v2), v3), v4))| {
            f(idx, v1, v2, v3, v4);
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn par_iter_mut4_visits_every_slot_with_its_index() {
        let mut a = vec![0usize; 1000];
        let mut b = vec![0u32; 1000];
        let mut c = vec![0.; 1000];
        let mut d = vec![false; 1000];
        par_iter_mut4(&mut a, &mut b, &mut c, &mut d, |i, a, b, c, d| {
            *a = i;
            *b = i as u32 * 2;
            *c = i as f64;
            *d = true;
        });
        for i in 0..1000 {
            assert_eq!(a[i], i);
            assert_eq!(b[i], i as u32 * 2);
            assert_eq!(c[i], i as f64);
            assert!(d[i]);
        }
    }

    #[test]
    fn into_par_iter_sums_like_sequential() {
        let s: usize = into_par_iter(0..100usize).map(|x| x * x).sum();
        assert_eq!(s, (0..100usize).map(|x| x * x).sum::<usize>());
    }
}
