#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use boop::configuration::Configuration;
    use boop::io::dat::Dat;
    use boop::io::FileFormat;
    use boop::neighbors::{self, NeighborMode};
    use boop::order::{self, OrderTable};
    use boop::progress::Bar;
    use boop::voronoi;
    use std::path::Path;

    const FCC: [f64; 4] = [0.190941, 0.574524, -0.159317, -0.013161];
    const BCC: [f64; 4] = [0.509175, 0.628539, -0.159317, 0.013161];
    const SC: [f64; 4] = [0.763763, 0.353553, 0.159317, 0.013161];

    fn load(filename: &str) -> Configuration {
        let dat = Dat {};
        match dat.read(Path::new(filename)) {
            Ok(config) => config,
            Err(e) => panic!("{}", e),
        }
    }

    fn assert_rows(table: &OrderTable, expected: &[f64]) {
        assert_eq!(table.columns(), expected.len());
        for row in table.iter_rows() {
            for (value, e) in row.iter().zip(expected.iter()) {
                assert_abs_diff_eq!(*value, *e, epsilon = 2e-5);
            }
        }
    }

    #[test]
    fn lattice_fcc_cutoff() {
        let config = load("tests/dat/fcc.dat");
        for average in [false, true].iter() {
            let table = order::compute_qls_and_neighbors(&config, *average,
                                                         false, 1.4, 2, true)
                        .unwrap();
            assert_eq!(table.rows(), 108);
            assert_rows(&table, &FCC);
        }
    }

    #[test]
    fn lattice_fcc_voronoi() {
        // the 12 facets of the rhombic dodecahedron are equal
        let config = load("tests/dat/fcc.dat");
        for average in [false, true].iter() {
            let table = order::compute_qls_and_neighbors(&config, *average,
                                                         true, 1.4, 2, true)
                        .unwrap();
            assert_rows(&table, &FCC);
        }
    }

    #[test]
    fn lattice_bcc_cutoff() {
        let config = load("tests/dat/bcc.dat");
        for average in [false, true].iter() {
            let table = order::compute_qls_and_neighbors(&config, *average,
                                                         false, 1.4, 2, true)
                        .unwrap();
            assert_eq!(table.rows(), 54);
            assert_rows(&table, &BCC);
        }
    }

    #[test]
    fn lattice_sc_cutoff_and_voronoi() {
        let config = load("tests/dat/sc.dat");
        for weighted in [false, true].iter() {
            let table = order::compute_qls_and_neighbors(&config, false,
                                                         *weighted, 1.4, 1, true)
                        .unwrap();
            assert_eq!(table.rows(), 64);
            assert_rows(&table, &SC);
        }
    }

    #[test]
    fn lattice_fcc_msm() {
        let config = load("tests/dat/fcc.dat");
        let table = order::compute_msms(&config, 6, false, false, 2, true).unwrap();
        assert_eq!(table.columns(), 7);
        assert_eq!(table.rows(), 108);
        for i in 0..table.rows() {
            assert_abs_diff_eq!(table.get(i, 0), 1., epsilon = 2e-5);
            assert_abs_diff_eq!(table.get(i, 2), 0., epsilon = 2e-5);
            assert_abs_diff_eq!(table.get(i, 4), FCC[0], epsilon = 2e-5);
            assert_abs_diff_eq!(table.get(i, 6), FCC[1], epsilon = 2e-5);
        }
        let table = order::compute_msms(&config, 6, true, true, 2, true).unwrap();
        for i in 0..table.rows() {
            assert_abs_diff_eq!(table.get(i, 4), FCC[2], epsilon = 2e-5);
            assert_abs_diff_eq!(table.get(i, 6), FCC[3], epsilon = 2e-5);
        }
    }

    #[test]
    fn lattice_no_self_bonds() {
        let config = load("tests/dat/bcc.dat");
        let bar = Bar::new(0, String::new());
        for mode in [NeighborMode::Cutoff(1.4), NeighborMode::Voronoi].iter() {
            let nlist = neighbors::resolve(&config, *mode, 3, &bar).unwrap();
            assert_eq!(nlist.num_points(), config.len());
            for bond in nlist.bonds() {
                assert_ne!(bond.query_point, bond.point);
            }
        }
    }

    #[test]
    fn lattice_bcc_voronoi_cells() {
        // truncated octahedra: 8 hexagons to the nearest and 6 squares to the
        // next nearest neighbours
        let config = load("tests/dat/bcc.dat");
        let bar = Bar::new(0, String::new());
        let tessellation = voronoi::tessellate(&config, 2, &bar).unwrap();
        let total = tessellation.volumes.iter().sum::<f64>();
        assert_abs_diff_eq!(total, 4.5f64.powi(3), epsilon = 1e-9);
        for i in 0..config.len() {
            assert_abs_diff_eq!(tessellation.volumes[i], 1.5f64.powi(3) / 2.,
                                epsilon = 1e-9);
            assert_eq!(tessellation.nlist.neighbors(i).len(), 14);
        }
    }

    #[test]
    fn lattice_thread_count_independent() {
        let config = load("tests/dat/bcc.dat");
        let one = order::compute_qls_and_neighbors(&config, true, true, 1.4, 1, true)
                  .unwrap();
        let many = order::compute_qls_and_neighbors(&config, true, true, 1.4, 4, true)
                   .unwrap();
        assert_eq!(one, many);
    }
}
