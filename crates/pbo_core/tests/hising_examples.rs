//! Known spin objectives solved directly and through every canonical form.

use pbo_core::{
    poly, solve_hising_bruteforce, solve_ising_bruteforce, solve_pubo_bruteforce,
    solve_qubo_bruteforce, Assignment, DomainKind, HIsing, Hoio, Label, Number,
};

struct Problem {
    problem: Hoio,
    solution: Assignment,
    obj: Number,
}

impl Problem {
    fn new(objective: HIsing, solution: Assignment, obj: i64) -> Self {
        Self {
            problem: Hoio::from(objective),
            solution,
            obj: Number::from(obj),
        }
    }

    fn check(&self, e: &Number, raw: &Assignment<usize>, from: DomainKind) {
        let sol = self.problem.convert_solution(raw, from).unwrap();
        assert!(self.problem.is_solution_valid(&sol));
        assert_eq!(sol, self.solution, "recovered from {}", from);
        assert_eq!(*e, self.obj);
    }

    fn run(&self) {
        assert_eq!(self.problem.solve_bruteforce().unwrap(), self.solution);
        assert_eq!(self.problem.value_number(&self.solution).unwrap(), self.obj);

        let (e, sol) = solve_qubo_bruteforce(&self.problem.to_qubo().unwrap()).unwrap();
        self.check(&e, &sol, DomainKind::Binary);

        let (e, sol) = solve_ising_bruteforce(&self.problem.to_ising().unwrap()).unwrap();
        self.check(&e, &sol, DomainKind::Spin);

        let degrees = std::iter::once(None).chain((2..=self.problem.degree()).map(Some));
        for deg in degrees {
            let hising = self.problem.to_hising(deg).unwrap();
            if let Some(d) = deg {
                assert!(hising.degree() <= d);
            }
            let (e, sol) = solve_hising_bruteforce(&hising).unwrap();
            self.check(&e, &sol, DomainKind::Spin);

            let pubo = self.problem.to_pubo(deg).unwrap();
            let (e, sol) = solve_pubo_bruteforce(&pubo).unwrap();
            self.check(&e, &sol, DomainKind::Binary);
        }
    }
}

fn all_minus_one(labels: &[Label]) -> Assignment {
    labels.iter().map(|l| (l.clone(), -1)).collect()
}

#[test]
fn quadratic_example() {
    let objective: HIsing = poly! { ["a"] => -1, ["b"] => 2, ["a", "b"] => -3, ["b", "c"] => -4, [] => -2 };
    let solution = all_minus_one(&["a".into(), "b".into(), "c".into()]);
    Problem::new(objective, solution, -10).run();
}

#[test]
fn degree_three_example() {
    let objective: HIsing = poly! {
        ["a"] => -1, ["b"] => 2, ["a", "b"] => -3, ["b", "c"] => -4, [] => -2,
        [0, 1, 2] => 1, [0] => 1, [1] => 1, [2] => 1,
    };
    let solution = all_minus_one(&["a".into(), "b".into(), "c".into(), 0.into(), 1.into(), 2.into()]);
    Problem::new(objective, solution, -14).run();
}

#[test]
fn degree_five_example() {
    let objective: HIsing = poly! {
        ["a"] => -1, ["b"] => 2, ["a", "b"] => -3, ["b", "c"] => -4, [] => -2,
        [0, 1, 2] => 1, [0] => -1, [1] => -2, [2] => 1, ["a", 0, 4, "b", "c"] => -3,
        [4, 2, 3, "a", "b"] => 2, [4, 2, 3, "b"] => -1, ["c"] => 4, [3] => 1,
    };
    let mut solution = all_minus_one(&["a".into(), "b".into(), "c".into(), 2.into(), 3.into(), 4.into()]);
    solution.insert(Label::from(0), 1);
    solution.insert(Label::from(1), 1);
    Problem::new(objective, solution, -26).run();
}

#[test]
fn reduction_keeps_provenance() {
    let objective: HIsing = poly! { ["a", "b", "c"] => 1, ["a", "b", "d"] => -1 };
    let problem = Hoio::from(objective);
    let ising = problem.to_ising().unwrap();
    assert!(ising.degree() <= 2);
    assert!(!ising.ancillas().is_empty());
    for (z, _) in ising.ancillas().iter() {
        assert!(*z >= problem.num_binary_variables());
    }
}
