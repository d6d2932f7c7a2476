use pbo_core::{hising_to_pubo, pubo_to_hising, solve_pubo_bruteforce, Assignment, Pubo};
use proptest::prelude::*;

/// Up to six terms of degree at most four over five variables.
fn arb_pubo() -> impl Strategy<Value = Pubo<usize>> {
    prop::collection::vec((prop::collection::vec(0usize..5, 0..5), -6i64..6), 0..6)
        .prop_map(Pubo::<usize>::from_terms)
}

fn assignments(n: usize) -> impl Iterator<Item = Assignment<usize>> {
    (0u32..(1 << n)).map(move |mask| (0..n).map(|i| (i, ((mask >> i) & 1) as i8)).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn no_zero_coefficients_survive(p in arb_pubo(), q in arb_pubo()) {
        for r in [&p + &q, &p - &p, &p * &q, pubo_to_hising(&p).to_binary()] {
            prop_assert!(r.terms().all(|(_, c)| !c.is_zero()));
        }
    }

    #[test]
    fn pow_matches_repeated_product(p in arb_pubo()) {
        prop_assert_eq!(p.pow(2), &p * &p);
        prop_assert_eq!(p.pow(3), &(&p * &p) * &p);
        prop_assert_eq!(p.pow(0), Pubo::<usize>::constant(1));
    }

    #[test]
    fn domain_round_trip_is_exact(p in arb_pubo()) {
        let h = pubo_to_hising(&p);
        prop_assert_eq!(hising_to_pubo(&h), p.clone());
        prop_assert!(h.degree() <= p.degree());
    }

    #[test]
    fn conversion_preserves_values(p in arb_pubo()) {
        let h = pubo_to_hising(&p);
        for x in assignments(5) {
            let s: Assignment<usize> = x.iter().map(|(&i, &b)| (i, 1 - 2 * b)).collect();
            prop_assert_eq!(p.value_number(&x).unwrap(), h.value_number(&s).unwrap());
        }
    }

    #[test]
    fn reduction_preserves_the_minimum(p in arb_pubo()) {
        let (expected, _) = p.minimum().unwrap();
        for degree in [2usize, 3] {
            let reduced = p.to_pubo(Some(degree)).unwrap();
            prop_assert!(reduced.degree() <= degree);
            let (e, raw) = solve_pubo_bruteforce(&reduced).unwrap();
            prop_assert_eq!(&e, &expected);
            let sol = p.convert_solution(&raw, pbo_core::DomainKind::Binary).unwrap();
            prop_assert_eq!(p.value_number(&sol).unwrap(), expected.clone());
        }
    }
}
