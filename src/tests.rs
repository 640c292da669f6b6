#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::num::NonZero;
    use std::thread;

    use itertools::Itertools;
    use ndarray::{array, Array2, ArrayView2};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::board::WorkBoard;
    use crate::cell::Mark;
    use crate::prepare::{find_max_value, invert_for_maximization, pad_to_square};
    use crate::solver::{augment, iteration_limit, prime_zeros, run, shift_minimum, Step};
    use crate::table::read_tables;
    use crate::{
        solve_max, solve_max_array, solve_min, solve_min_array, Assignment, CapacityError, Cost, NameKind, Objective,
        PrefPair, PreferenceTable, Scoring, Solution, SolveError, TableError, TableIssue,
    };

    const SAMPLE: &str = ";Flat A;Flat B
Alice;12;3
Bob;7;15

;Alice;Bob
Flat A;10;4
Flat B;1;15
";

    fn pairs(cells: &[(usize, usize)]) -> Vec<Assignment> {
        cells.iter().copied().map(Assignment::from).collect()
    }

    fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Array2<Cost> {
        Array2::from_shape_simple_fn((rows, cols), || rng.gen_range(-20..50))
    }

    /// Best total over every way of picking `min(rows, cols)` cells with distinct rows and columns.
    fn brute_force(matrix: ArrayView2<Cost>, objective: Objective) -> Cost {
        let (rows, cols) = matrix.dim();
        let totals = if rows <= cols {
            (0..cols).permutations(rows)
                .map(|picked| picked.iter().enumerate().map(|(row, col)| matrix[(row, *col)]).sum::<Cost>())
                .collect_vec()
        } else {
            (0..rows).permutations(cols)
                .map(|picked| picked.iter().enumerate().map(|(col, row)| matrix[(*row, col)]).sum::<Cost>())
                .collect_vec()
        };

        match objective {
            Objective::Minimize => totals.into_iter().min().unwrap(),
            Objective::Maximize => totals.into_iter().max().unwrap(),
        }
    }

    fn assert_valid(matrix: ArrayView2<Cost>, solution: &Solution) {
        let (rows, cols) = matrix.dim();
        assert_eq!(solution.assignments.len(), rows.min(cols));

        let used_rows: HashSet<_> = solution.assignments.iter().map(|a| a.row).collect();
        let used_cols: HashSet<_> = solution.assignments.iter().map(|a| a.col).collect();
        assert_eq!(used_rows.len(), solution.assignments.len());
        assert_eq!(used_cols.len(), solution.assignments.len());
        assert!(solution.assignments.iter().all(|a| a.row < rows && a.col < cols));

        let total: Cost = solution.assignments.iter().map(|a| matrix[(a.row, a.col)]).sum();
        assert_eq!(solution.total, total);
    }

    #[test]
    fn min_prefers_diagonal() {
        let solution = solve_min(&[[1_i64, 2], [2, 1]]).unwrap();
        assert_eq!(solution.total, 2);
        assert_eq!(solution.assignments, pairs(&[(0, 0), (1, 1)]));
    }

    #[test]
    fn max_prefers_anti_diagonal() {
        let solution = solve_max(&[[1_i64, 2], [2, 1]]).unwrap();
        assert_eq!(solution.total, 4);
        assert_eq!(solution.assignments, pairs(&[(0, 1), (1, 0)]));
    }

    #[test]
    fn wide_matrix() {
        let matrix = array![[1, 2, 3], [4, 5, 6]];
        let solution = solve_min_array(matrix.view()).unwrap();

        assert_valid(matrix.view(), &solution);
        assert_eq!(solution.total, 6);
        // ties with {(0, 0), (1, 1)}; the scan order settles on this one
        assert_eq!(solution.assignments, pairs(&[(0, 1), (1, 0)]));
    }

    #[test]
    fn tall_matrix() {
        let solution = solve_min(&[[5_i64], [1], [3]]).unwrap();
        assert_eq!(solution.total, 1);
        assert_eq!(solution.assignments, pairs(&[(1, 0)]));
    }

    #[test]
    fn max_with_negative_values() {
        let solution = solve_max(&[[-5_i64, -1, -3]]).unwrap();
        assert_eq!(solution.total, -1);
        assert_eq!(solution.assignments, pairs(&[(0, 1)]));
    }

    #[test]
    fn single_cell() {
        for objective in [Objective::Minimize, Objective::Maximize] {
            let solution = crate::solve_array(array![[7]].view(), objective).unwrap();
            assert_eq!(solution.total, 7);
            assert_eq!(solution.assignments, pairs(&[(0, 0)]));
        }
    }

    #[test]
    fn empty_matrix() {
        let no_rows: [Vec<Cost>; 0] = [];
        assert_eq!(solve_min(&no_rows), Err(SolveError::EmptyMatrix));
        assert_eq!(solve_max(&no_rows), Err(SolveError::EmptyMatrix));
        assert_eq!(solve_min(&[Vec::<Cost>::new()]), Err(SolveError::EmptyMatrix));
        assert_eq!(solve_max_array(Array2::<Cost>::zeros((0, 3)).view()), Err(SolveError::EmptyMatrix));
        assert_eq!(find_max_value(Array2::<Cost>::zeros((2, 0)).view()), Err(SolveError::EmptyMatrix));
    }

    #[test]
    fn jagged_matrix() {
        let matrix: Vec<Vec<Cost>> = vec![vec![1, 2], vec![3, 4], vec![5]];
        assert_eq!(solve_min(&matrix), Err(SolveError::MalformedMatrix { row: 2, expected: 2, found: 1 }));
        assert_eq!(solve_max(&matrix), Err(SolveError::MalformedMatrix { row: 2, expected: 2, found: 1 }));
    }

    #[test]
    fn padding_and_inversion() {
        let matrix = array![[1, 8, 3]];
        assert_eq!(find_max_value(matrix.view()), Ok(8));
        assert_eq!(invert_for_maximization(matrix.view(), 8), Ok(array![[7, 0, 5]]));
        assert_eq!(pad_to_square(matrix.view(), 16), array![[1, 8, 3], [16, 16, 16], [16, 16, 16]]);
        assert_eq!(pad_to_square(matrix.t(), 0), array![[1, 0, 0], [8, 0, 0], [3, 0, 0]]);
    }

    #[test]
    fn extreme_values_overflow() {
        let inverted = solve_max(&[[Cost::MIN, 0]]);
        assert_eq!(inverted, Err(SolveError::Overflow("inverting the matrix")));
        assert_eq!(inverted.unwrap_err().to_string(), "arithmetic overflow while inverting the matrix");

        assert_eq!(solve_min(&[[Cost::MIN, Cost::MAX]]), Err(SolveError::Overflow("reducing rows and columns")));
        assert_eq!(solve_max(&[[Cost::MAX; 2]; 2]), Err(SolveError::Overflow("totalling the assignment")));

        let mut board = WorkBoard::new(array![[0, Cost::MAX], [1, 2]]);
        board.row_cover[0] = true;
        board.col_cover[1] = true;
        assert_eq!(shift_minimum(&mut board), Err(SolveError::Overflow("shifting the smallest uncovered value")));
    }

    #[test]
    fn step_limit_stalls() {
        let mut board = WorkBoard::new(array![[1, 2], [2, 1]]);
        assert_eq!(run(&mut board, 1), Err(SolveError::Stalled { iterations: 1 }));

        let mut board = WorkBoard::new(array![[1, 2], [2, 1]]);
        assert!(run(&mut board, iteration_limit(2)).is_ok());
        assert_eq!(board.mask, array![[Mark::Starred, Mark::Unmarked], [Mark::Unmarked, Mark::Starred]]);
    }

    #[test]
    fn broken_boards_are_reported() {
        let mut board = WorkBoard::new(Array2::zeros((2, 2)));
        board.col_cover.fill(true);
        assert_eq!(prime_zeros(&mut board), Err(SolveError::Invariant("searching for zeros on a fully covered board")));

        let mut board = WorkBoard::new(array![[0, 1], [1, 0]]);
        board.row_cover.fill(true);
        assert_eq!(shift_minimum(&mut board), Err(SolveError::Invariant("no uncovered cell left to shift")));

        let mut board = WorkBoard::new(Array2::zeros((2, 2)));
        board.mask[(0, 0)] = Mark::Starred;
        assert_eq!(
            augment(&mut board, (1, 0)),
            Err(SolveError::Invariant("starred zero on an augmenting path has no prime in its row"))
        );

        let mut board = WorkBoard::new(array![[0, 1], [1, 0]]);
        assert_eq!(prime_zeros(&mut board), Ok(Step::Augment { origin: (0, 0) }));
    }

    #[test]
    fn uncovered_zero_scan_order() {
        let mut board = WorkBoard::new(array![[1, 0, 0], [0, 2, 0], [0, 0, 3]]);
        assert_eq!(board.find_uncovered_zero(), Some((0, 1)));

        board.row_cover[0] = true;
        assert_eq!(board.find_uncovered_zero(), Some((1, 0)));

        board.col_cover[0] = true;
        assert_eq!(board.find_uncovered_zero(), Some((1, 2)));
        assert_eq!(board.smallest_uncovered(), Some(0));

        board.clear_covers();
        assert!(board.is_uncovered((0, 0)));
    }

    #[test]
    fn augmenting_flips_path() {
        let mut board = WorkBoard::new(Array2::zeros((2, 2)));
        board.mask[(0, 0)] = Mark::Starred;
        board.mask[(1, 0)] = Mark::Primed;
        board.mask[(0, 1)] = Mark::Primed;

        assert_eq!(board.star_in_col(0), Some(0));
        assert_eq!(board.prime_in_row(0), Some(1));
        assert_eq!(board.star_in_row(1), None);

        board.augment(&[(1, 0), (0, 0), (0, 1)]);
        board.clear_primes();
        assert_eq!(board.mask, array![[Mark::Unmarked, Mark::Starred], [Mark::Starred, Mark::Unmarked]]);
    }

    #[test]
    fn matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let (rows, cols) = (rng.gen_range(1..=5), rng.gen_range(1..=5));
            let matrix = random_matrix(&mut rng, rows, cols);

            let min = solve_min_array(matrix.view()).unwrap();
            assert_valid(matrix.view(), &min);
            assert_eq!(min.total, brute_force(matrix.view(), Objective::Minimize), "min of\n{matrix}");

            let max = solve_max_array(matrix.view()).unwrap();
            assert_valid(matrix.view(), &max);
            assert_eq!(max.total, brute_force(matrix.view(), Objective::Maximize), "max of\n{matrix}");
        }
    }

    #[test]
    fn max_is_min_of_inverted() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let (rows, cols) = (rng.gen_range(1..=6), rng.gen_range(1..=6));
            let matrix = random_matrix(&mut rng, rows, cols);
            let max_value = *matrix.iter().max().unwrap();
            let inverted = matrix.mapv(|value| max_value - value);

            let max = solve_max_array(matrix.view()).unwrap();
            let min = solve_min_array(inverted.view()).unwrap();

            assert_eq!(max.assignments.len(), min.assignments.len());
            assert_eq!(max.total + min.total, max_value * max.assignments.len() as Cost);
            if rows == cols {
                assert_eq!(max.assignments, min.assignments);
            }
        }
    }

    #[test]
    fn repeated_solves_agree() {
        let mut rng = StdRng::seed_from_u64(3);
        let matrix = random_matrix(&mut rng, 7, 5);

        let first = solve_min_array(matrix.view()).unwrap();
        assert_eq!(solve_min_array(matrix.view()).unwrap(), first);

        let concurrent = thread::scope(|scope| {
            let handles = (0..4).map(|_| scope.spawn(|| solve_min_array(matrix.view()))).collect_vec();
            handles.into_iter().map(|handle| handle.join().unwrap()).collect_vec()
        });
        assert!(concurrent.into_iter().all(|solution| solution.as_ref() == Ok(&first)));
    }

    #[test]
    fn solution_display() {
        let solution = solve_min(&[[1_i64, 2], [2, 1]]).unwrap();
        assert_eq!(format!("{}", solution), "Cost: 2
0 - 0
1 - 1
");
    }

    #[test]
    fn split_tables() {
        let (first, second) = read_tables("\n\n;Flat A\nAlice;1\n\n\n;Alice\nFlat A;2\n\n").unwrap();
        assert_eq!(first, vec![vec!["", "Flat A"], vec!["Alice", "1"]]);
        assert_eq!(second, vec![vec!["", "Alice"], vec!["Flat A", "2"]]);
    }

    #[test]
    fn tables_need_separator() {
        match read_tables(";Flat A\nAlice;1\n") {
            Err(TableError::Invalid(issues)) => assert_eq!(issues, vec![TableIssue::MissingSeparator]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn stray_blank_line() {
        match read_tables(";Flat A\nAlice;1\n\n;Alice\n\nFlat A;2\n") {
            Err(TableError::Invalid(issues)) => assert_eq!(issues, vec![TableIssue::StrayBlankLine { line: 5 }]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parse_sample() {
        let table = PreferenceTable::parse(SAMPLE).unwrap();

        assert_eq!(table.destinations(), ["Flat A", "Flat B"]);
        assert_eq!(table.applicants(), ["Alice", "Bob"]);
        assert_eq!(table.pair(0, 0), Some(PrefPair { applicant_points: 12, destination_points: 10 }));
        assert_eq!(table.pair(0, 1), Some(PrefPair { applicant_points: 7, destination_points: 4 }));
        assert_eq!(table.pair(1, 0), Some(PrefPair { applicant_points: 3, destination_points: 1 }));
        assert_eq!(table.pair(1, 1), Some(PrefPair { applicant_points: 15, destination_points: 15 }));
        assert_eq!(table.capacity("Flat B"), Some(NonZero::new(1).unwrap()));
    }

    #[test]
    fn parse_comma_delimited() {
        let table = PreferenceTable::parse(",Flat A,Flat B\nAlice,1,2\n\n,Alice\nFlat A,3\nFlat B,4\n").unwrap();

        assert_eq!(table.destinations(), ["Flat A", "Flat B"]);
        assert_eq!(table.pair(0, 0), Some(PrefPair { applicant_points: 1, destination_points: 3 }));
        assert_eq!(table.pair(1, 0), Some(PrefPair { applicant_points: 2, destination_points: 4 }));
    }

    #[test]
    fn mismatched_names() {
        let text = ";Flat A\nAlice;1\nEve;2\n\n;Alice;Bob\nFlat A;3;4\n";

        match PreferenceTable::parse(text) {
            Err(TableError::Invalid(issues)) => assert_eq!(issues, vec![
                TableIssue::UnknownName { table: 1, other: 2, kind: NameKind::Applicant, name: "Eve".to_string() },
                TableIssue::MissingName { table: 1, other: 2, kind: NameKind::Applicant, name: "Bob".to_string() },
            ]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn duplicate_header_name() {
        let text = ";Flat A;Flat A\nAlice;1;1\n\n;Alice\nFlat A;3\n";

        match PreferenceTable::parse(text) {
            Err(TableError::Invalid(issues)) => assert_eq!(issues, vec![
                TableIssue::DuplicateName { table: 1, kind: NameKind::Destination, name: "Flat A".to_string() },
            ]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_values() {
        let text = ";Flat A;Flat B\nAlice;x;2\n\n;Alice\nFlat A;3\nFlat B\n";

        match PreferenceTable::parse(text) {
            Err(TableError::Invalid(issues)) => assert_eq!(issues, vec![
                TableIssue::NotANumber { table: 1, row: "Alice".to_string(), column: "Flat A".to_string(), found: "x".to_string() },
                TableIssue::MissingValue { table: 2, row: "Flat B".to_string(), column: "Alice".to_string() },
            ]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn capacity_overrides() {
        let mut table = PreferenceTable::parse(SAMPLE).unwrap();

        assert_eq!(table.set_capacity("Nowhere", 2).err(), Some(CapacityError::UnknownDestination("Nowhere".to_string())));
        assert_eq!(table.set_capacity("Flat A", 0).err(), Some(CapacityError::ZeroCapacity("Flat A".to_string())));
        table.set_capacity("Flat B", 3).unwrap();
        assert_eq!(table.capacity("Flat B"), Some(NonZero::new(3).unwrap()));

        let expanded = table.expand_capacities();
        assert_eq!(expanded.destinations(), ["Flat A", "Flat B", "Flat B", "Flat B"]);
        assert_eq!(expanded.pair(3, 1), table.pair(1, 1));
        assert_eq!(expanded.capacity("Flat B"), Some(NonZero::new(1).unwrap()));
    }

    #[test]
    fn extrema() {
        let mut table = PreferenceTable::parse(";Flat A;Flat B\nAlice;0;15\n\n;Alice\nFlat A;9\nFlat B;15\n").unwrap();
        table.apply_extrema(10);

        assert_eq!(table.pair(0, 0), Some(PrefPair { applicant_points: -100, destination_points: -100 }));
        assert_eq!(table.pair(1, 0), Some(PrefPair { applicant_points: 25, destination_points: 25 }));
    }

    #[test]
    fn scoring_strategies() {
        assert_eq!(Scoring::Sum.combine(10, 1), 11);
        assert_eq!(Scoring::Product.combine(3, 4), 12);
        assert_eq!(Scoring::Product.combine(-100, 5), -500);
        assert_eq!(Scoring::Product.combine(-100, -100), -10000);
        assert_eq!(Scoring::Balanced.combine(7, 7), 14);
        assert_eq!(Scoring::Balanced.combine(3, 11), 12);
        assert_eq!(Scoring::Balanced.combine(10, 1), 8);
        assert_eq!(Scoring::Product.combine(Cost::MAX, 2), Cost::MAX);
        assert_eq!(Scoring::Product.combine(Cost::MIN, 2), -Cost::MAX);
        assert_eq!(Scoring::Sum.combine(Cost::MAX, 1), Cost::MAX);
        assert_eq!(Scoring::Balanced.combine(Cost::MIN, Cost::MAX), -1 - (u64::MAX / 3) as Cost);
        assert_eq!(Scoring::Product.formula(), "a * b, negative if either is");
        assert_eq!("balanced".parse::<Scoring>(), Ok(Scoring::Balanced));
        assert_eq!(Scoring::Product.to_string(), "product");
    }

    #[test]
    fn match_sample() {
        let mut table = PreferenceTable::parse(SAMPLE).unwrap();
        table.apply_extrema(10);

        let matching = table.match_with(|a, b| Scoring::Sum.combine(a, b)).unwrap();
        assert_eq!(matching.score(), 72);
        assert_eq!(format!("{}", matching), "(Alice;Flat A;12/10) (Bob;Flat B;25/25) 
Score: 72
");
    }

    #[test]
    fn match_with_capacity() {
        let text = ";Flat A;Flat B\nAlice;12;3\nBob;7;15\nCarol;2;14\n\n;Alice;Bob;Carol\nFlat A;10;4;5\nFlat B;1;15;13\n";
        let mut table = PreferenceTable::parse(text).unwrap();
        table.set_capacity("Flat B", 2).unwrap();
        let table = table.expand_capacities();

        let matching = table.match_with(|a, b| Scoring::Sum.combine(a, b)).unwrap();
        let placed = matching.pairs().map(|pairing| (pairing.applicant, pairing.destination)).sorted().collect_vec();
        assert_eq!(placed, vec![("Alice", "Flat A"), ("Bob", "Flat B"), ("Carol", "Flat B")]);
        assert_eq!(matching.score(), 22 + 30 + 27);
    }

    #[test]
    fn table_display() {
        let table = PreferenceTable::parse(SAMPLE).unwrap();
        assert_eq!(format!("{}", table), "          || Alice    | Bob      
----------------------------------
 Flat A   ||    12/10 |      7/4 
 Flat B   ||      3/1 |    15/15 
");
    }
}
