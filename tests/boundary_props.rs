use proptest::prelude::*;
use u_popheur::engine::{
    BoundaryOutcome, Config, DiscardScope, OutOfBoundsPolicy, Parameter, Population, SearchSpace,
};
use u_popheur::functions::sphere;

fn repairing_policy() -> impl Strategy<Value = OutOfBoundsPolicy> {
    prop_oneof![
        Just(OutOfBoundsPolicy::PeriodicWrap),
        Just(OutOfBoundsPolicy::Reflect),
        Just(OutOfBoundsPolicy::ClampAtBoundary),
    ]
}

proptest! {
    #[test]
    fn repaired_coordinates_stay_in_bounds(
        policy in repairing_policy(),
        lo in -100.0f64..100.0,
        width in 0.0f64..50.0,
        integer in any::<bool>(),
        xs in prop::collection::vec(-1e6f64..1e6, 3),
    ) {
        let hi = lo + width;
        prop_assume!(!integer || lo.ceil() <= hi.floor());

        let space = SearchSpace::new(Parameter::list("x", 3, lo, hi, integer)).unwrap();
        let config = Config::default().with_out_of_bounds_policy(policy).with_seed(0);
        let mut population = Population::new(1, sphere, space, config).unwrap();
        population.individuals_mut()[0].position = xs;

        let outcome = population.check_boundary(0);
        prop_assert_ne!(outcome, BoundaryOutcome::Discard);

        for &x in &population.individuals()[0].position {
            prop_assert!(x >= lo && x <= hi, "{x} outside [{lo}, {hi}]");
            if integer {
                prop_assert_eq!(x.fract(), 0.0);
            }
        }
    }

    #[test]
    fn discard_never_alters_position(
        lo in -10.0f64..10.0,
        excess in 1e-6f64..100.0,
        inner in 0.0f64..1.0,
        integer in any::<bool>(),
    ) {
        // the in-bounds first coordinate must not be snapped either
        let (lo, hi) = (lo.floor(), lo.floor() + 1.0);
        let space = SearchSpace::new(Parameter::list("x", 2, lo, hi, integer)).unwrap();
        let config = Config::default()
            .with_out_of_bounds_policy(OutOfBoundsPolicy::Discard(DiscardScope::Individual))
            .with_seed(0);
        let mut population = Population::new(1, sphere, space, config).unwrap();
        let position = vec![lo + inner, hi + excess];
        population.individuals_mut()[0].position = position.clone();

        prop_assert_eq!(population.check_boundary(0), BoundaryOutcome::Discard);
        prop_assert_eq!(&population.individuals()[0].position, &position);
    }

    #[test]
    fn random_points_respect_integrality(
        seed in any::<u64>(),
        lo in -50i32..50,
        span in 0i32..100,
    ) {
        let (lo, hi) = (lo as f64, (lo + span) as f64);
        let space = SearchSpace::new(vec![
            Parameter::integer("k", lo, hi),
            Parameter::continuous("c", lo, hi),
        ])
        .unwrap();
        let config = Config::default().with_seed(seed);
        let mut population = Population::new(16, sphere, space, config).unwrap();
        population.initialize_random().unwrap();

        for ind in population.individuals() {
            prop_assert_eq!(ind.position[0].fract(), 0.0);
            prop_assert!(population.search_space().contains(&ind.position));
        }
    }
}
