use proptest::prelude::*;
use self_assembly_engine::{ClusterDetector, Lattice, Orientation};

fn filled(size: usize, particle_length: usize, seed: u64) -> Lattice {
    let mut lattice = Lattice::with_seed(size, particle_length, seed).unwrap();
    lattice.fill().unwrap();
    lattice
}

fn occupancy(lattice: &Lattice) -> Vec<Option<(u32, Orientation)>> {
    let size = lattice.size();
    (0..size * size)
        .map(|i| {
            lattice
                .get_cell(i % size, i / size)
                .map(|p| (p.id(), p.orientation()))
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: a filled lattice is consistent and jammed
    #[test]
    fn prop_fill_is_valid_and_jammed(size in 10usize..=24, particle_length in 2usize..=6, seed in any::<u64>()) {
        let lattice = filled(size, particle_length, seed);

        prop_assert!(lattice.validate().is_ok());
        prop_assert!(lattice.is_jammed());
        prop_assert_eq!(lattice.occupied_cells(), lattice.particle_count() * particle_length);
        prop_assert!(lattice.density() > 0.0 && lattice.density() <= 1.0);

        let ids: Vec<u32> = lattice.particles().iter().map(|p| p.id()).collect();
        let expected: Vec<u32> = (1..=lattice.particle_count() as u32).collect();
        prop_assert_eq!(ids, expected);
    }

    /// Property: diffusion never creates, destroys or overlaps particles
    #[test]
    fn prop_step_conserves_particles(
        size in 10usize..=20,
        particle_length in 2usize..=5,
        seed in any::<u64>(),
        steps in 1u64..=5,
    ) {
        let mut lattice = filled(size, particle_length, seed);
        let count = lattice.particle_count();
        let occupied = lattice.occupied_cells();
        let orientations: Vec<_> = lattice.particles().iter().map(|p| p.orientation()).collect();

        for _ in 0..steps {
            lattice.step();
            prop_assert_eq!(lattice.particle_count(), count);
            prop_assert_eq!(lattice.occupied_cells(), occupied);
            prop_assert!(lattice.validate().is_ok());
        }
        prop_assert_eq!(lattice.diffusion_steps(), steps);

        let after: Vec<_> = lattice.particles().iter().map(|p| p.orientation()).collect();
        prop_assert_eq!(after, orientations);
    }

    /// Property: restoring a backup reproduces the lattice cell for cell
    #[test]
    fn prop_backup_round_trip(size in 10usize..=20, particle_length in 2usize..=5, seed in any::<u64>(), steps in 0u64..=3) {
        let mut lattice = filled(size, particle_length, seed);
        for _ in 0..steps {
            lattice.step();
        }

        let record = lattice.backup();
        let restored = Lattice::restore(&record).unwrap();

        prop_assert_eq!(restored.backup(), record);
        prop_assert_eq!(restored.diffusion_steps(), steps);
        prop_assert_eq!(occupancy(&restored), occupancy(&lattice));
        prop_assert!(restored.validate().is_ok());
    }

    /// Property: checking is deterministic and leaves the lattice untouched
    #[test]
    fn prop_check_is_pure(size in 10usize..=20, particle_length in 2usize..=5, seed in any::<u64>(), threshold in 0.05f64..=1.0) {
        let lattice = filled(size, particle_length, seed);
        let before = lattice.backup();

        let mut detector = ClusterDetector::new();
        let first = detector.analyze(&lattice).unwrap();
        let second = detector.analyze(&lattice).unwrap();
        let fresh = ClusterDetector::new().analyze(&lattice).unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(first, fresh);
        prop_assert_eq!(
            lattice.check_threshold(threshold).unwrap(),
            first.is_self_assembled(threshold)
        );
        prop_assert_eq!(lattice.backup(), before);

        for stats in [first.horizontal, first.vertical] {
            prop_assert!(stats.largest <= stats.total);
        }
        prop_assert_eq!(first.horizontal.total + first.vertical.total, lattice.occupied_cells());
    }

    /// Property: the same seed replays the same run
    #[test]
    fn prop_seed_reproduces_run(size in 10usize..=16, particle_length in 2usize..=4, seed in any::<u64>()) {
        let mut a = filled(size, particle_length, seed);
        let mut b = filled(size, particle_length, seed);
        a.step();
        b.step();
        prop_assert_eq!(a.backup(), b.backup());
    }
}
