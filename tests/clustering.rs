use happieclust::distance::{kdtw_distance, msm_distance, sbd_distance, KdtwParams};
use happieclust::{
    cut_tree, DistanceGraph, GraphLinkageEngine, HappieClust, HappieConfig, Linkage, MetricKind,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn wave(i: usize, len: usize) -> Vec<f64> {
    let group = (i % 3) as f64;
    (0..len)
        .map(|t| (t as f64 * 0.4 + group * 2.0).sin() * (1.0 + group) + (i as f64 * 0.37).cos() * 0.05)
        .collect()
}

/// Relabels by first appearance so two partitions compare equal.
fn canonical(labels: &[usize]) -> Vec<usize> {
    let mut seen: Vec<usize> = Vec::new();
    labels
        .iter()
        .map(|l| match seen.iter().position(|s| s == l) {
            Some(p) => p,
            None => {
                seen.push(*l);
                seen.len() - 1
            }
        })
        .collect()
}

/// Plain O(n^3) agglomerative clustering over 1-D points.
/// Returns merge distances and the partition before every merge.
fn brute_force(points: &[f64], method: Linkage) -> (Vec<f64>, Vec<Vec<usize>>) {
    let mut clusters: Vec<Vec<usize>> = (0..points.len()).map(|i| vec![i]).collect();
    let mut distances = Vec::new();
    let mut partitions = Vec::new();

    while clusters.len() > 1 {
        let mut labels = vec![0; points.len()];
        for (c, members) in clusters.iter().enumerate() {
            for &m in members {
                labels[m] = c;
            }
        }
        partitions.push(canonical(&labels));

        let mut best = (0, 1, f64::INFINITY);
        for a in 0..clusters.len() {
            for b in (a + 1)..clusters.len() {
                let pair_distances = clusters[a]
                    .iter()
                    .flat_map(|&i| clusters[b].iter().map(move |&j| (points[i] - points[j]).abs()));
                let d = match method {
                    Linkage::Single => pair_distances.fold(f64::INFINITY, f64::min),
                    _ => pair_distances.fold(0.0, f64::max),
                };
                if d < best.2 {
                    best = (a, b, d);
                }
            }
        }
        let merged = clusters.remove(best.1);
        clusters[best.0].extend(merged);
        distances.push(best.2);
    }
    (distances, partitions)
}

#[test]
fn test_two_obvious_groups() {
    init_logging();
    let data = vec![vec![0.0, 0.0, 0.0], vec![0.0, 0.0, 1.0], vec![5.0, 5.0, 5.0], vec![5.0, 5.0, 6.0]];

    for (n_pivots, seed) in (2..=4).flat_map(|k| (0..64).map(move |seed| (k, seed))) {
        let config = HappieConfig::default()
            .with_metric(MetricKind::Euclidean)
            .with_method(Linkage::Single)
            .with_n_pivots(n_pivots)
            .with_s(1.0)
            .with_m(1.0)
            .with_n_clusters(2)
            .with_random_state(seed);

        let labels = HappieClust::new(config)
            .unwrap()
            .fit_predict(&data)
            .unwrap_or_else(|e| panic!("{} pivots, seed {}: {}", n_pivots, seed, e));
        assert_eq!(labels, vec![0, 0, 1, 1], "{} pivots, seed {}", n_pivots, seed);
    }
}

#[test]
fn test_complete_graph_matches_exact_hac() {
    // All pairwise distances are distinct, so exact HAC has no ties.
    let points: [f64; 6] = [0.0, 1.0, 3.0, 10.0, 12.5, 16.0];

    for method in [Linkage::Single, Linkage::Complete] {
        let mut graph = DistanceGraph::new(points.len());
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                graph.insert_edge(i, j, (points[i] - points[j]).abs()).unwrap();
            }
        }

        let linkage = GraphLinkageEngine::new(method).run(graph).unwrap();
        let (expected_distances, partitions) = brute_force(&points, method);

        assert_eq!(linkage.distances(), expected_distances, "{:?}", method);
        for (merges, partition) in partitions.iter().enumerate() {
            let labels = cut_tree(&linkage, points.len() - merges).unwrap();
            assert_eq!(&labels, partition, "{:?} with {} merges", method, merges);
        }
    }
}

#[test]
fn test_full_budget_pipeline_matches_exact_hac() {
    let points = [0.0, 1.0, 3.0, 10.0, 12.5, 16.0];
    let data: Vec<Vec<f64>> = points.iter().map(|&p| vec![p]).collect();

    for method in [Linkage::Single, Linkage::Complete] {
        for seed in 0..16 {
            let config = HappieConfig::default()
                .with_metric(MetricKind::Euclidean)
                .with_method(method)
                .with_n_pivots(2)
                .with_s(1.0)
                .with_m(1.0)
                .with_random_state(seed);
            let linkage = HappieClust::new(config).unwrap().linkage(&data).unwrap();
            let (expected_distances, partitions) = brute_force(&points, method);

            assert_eq!(linkage.distances(), expected_distances, "{:?}, seed {}", method, seed);
            for (merges, partition) in partitions.iter().enumerate() {
                assert_eq!(&linkage.cut(points.len() - merges).unwrap(), partition);
            }
            // Two obvious groups.
            assert_eq!(linkage.cut(2).unwrap(), vec![0, 0, 0, 1, 1, 1]);
        }
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    init_logging();
    let data: Vec<Vec<f64>> = (0..30).map(|i| wave(i, 16)).collect();
    let config = HappieConfig::default()
        .with_s(0.5)
        .with_m(1.0)
        .with_n_pivots(6)
        .with_random_state(7);

    let first = HappieClust::new(config.clone()).unwrap().fit(&data).unwrap();
    let second = HappieClust::new(config.clone()).unwrap().fit(&data).unwrap();
    assert_eq!(first.linkage, second.linkage);
    assert_eq!(first.stats, second.stats);

    // Thread count must not change anything.
    let parallel = HappieClust::new(config.with_n_jobs(4)).unwrap().fit(&data).unwrap();
    assert_eq!(first.linkage, parallel.linkage);
}

#[test]
fn test_linkage_structure() {
    let data: Vec<Vec<f64>> = (0..40).map(|i| wave(i, 12)).collect();
    for method in [Linkage::Average, Linkage::Ward, Linkage::Complete] {
        let config = HappieConfig::default()
            .with_method(method)
            .with_n_pivots(5)
            .with_s(0.3)
            .with_m(1.0)
            .with_random_state(3);
        let linkage = HappieClust::new(config).unwrap().linkage(&data).unwrap();

        assert_eq!(linkage.len(), 39);
        assert_eq!(linkage.rows().last().unwrap().size, 40);
        assert!(linkage.validate().is_ok());
        for (step, row) in linkage.iter().enumerate() {
            assert!(row.cluster_a < row.cluster_b);
            assert!(row.cluster_b < 40 + step);
            assert!(row.distance.is_finite());
        }
        assert_eq!(linkage.to_array().len(), 39);
    }
}

#[test]
fn test_every_metric_runs() {
    let data: Vec<Vec<f64>> = (0..15).map(|i| wave(i, 10)).collect();
    for metric in [
        MetricKind::Euclidean,
        MetricKind::Lorentzian,
        MetricKind::Chebyshev,
        MetricKind::Msm,
        MetricKind::Kdtw,
        MetricKind::Sbd,
        MetricKind::Dtw,
    ] {
        let config = HappieConfig::default()
            .with_metric(metric)
            .with_n_pivots(3)
            .with_s(0.0)
            .with_m(1.0)
            .with_n_clusters(3)
            .with_random_state(11);
        let labels = HappieClust::new(config).unwrap().fit_predict(&data).unwrap();
        assert_eq!(labels.len(), 15);
        assert_eq!(labels[0], 0);
        assert!(labels.iter().all(|&l| l < 3));
    }
}

#[test]
fn test_kernel_properties() {
    let x = [1.0, 3.0, 2.0, 5.0, 4.0];
    let y = [2.0, 2.0, 4.0, 1.0];

    assert_eq!(msm_distance(&x, &x, 0.5), 0.0);
    assert!(msm_distance(&x, &y, 0.5) > 0.0);

    let sbd = sbd_distance(&x, &y);
    assert!((0.0..=2.0).contains(&sbd));
    assert!(sbd_distance(&x, &x).abs() < 1e-9);

    let kdtw = kdtw_distance(&x, &y, &KdtwParams::default());
    assert!((0.0..=1.0).contains(&kdtw));
    assert!(kdtw_distance(&x, &x, &KdtwParams::default()).abs() < 1e-9);
}

#[test]
fn test_config_file_drives_run() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[distance]\nmetric = dtw\n\n[clustering]\nmethod = complete\nn_clusters = 2\nn_pivots = 4\ns = 0.0\nm = 1.0\nrandom_state = 5\n\n[processor]\nn_jobs = 2"
    )
    .unwrap();

    let config = HappieConfig::from_ini(file.path()).unwrap();
    assert_eq!(config.clustering.method, Linkage::Complete);

    // Two tight groups far apart; sequences alternate between them.
    let data: Vec<Vec<f64>> = (0..24)
        .map(|i| {
            let base = if i % 2 == 0 { 0.0 } else { 9.0 };
            (0..4).map(|t| base + ((i * 7 + t * 3) % 5) as f64 * 0.05).collect()
        })
        .collect();
    let labels = HappieClust::new(config).unwrap().fit_predict(&data).unwrap();
    let expected: Vec<usize> = (0..24).map(|i| i % 2).collect();
    assert_eq!(labels, expected);
}
