use crate::{
    Integrator, NumericFunction, ParseError, Pipeline, Request, RiemannError, Rule, integrate,
    normalize, normalize_or_zero, parse,
};

fn f(text: &str) -> NumericFunction {
    normalize(text).unwrap().function
}

#[test]
fn test_scenario_left_single_interval() {
    let result = integrate(&f("x**2"), 0.0, 5.0, 1, Rule::Left).unwrap();
    assert_eq!(result.partition, vec![0.0, 5.0]);
    assert_eq!(result.heights, vec![0.0]);
    assert_eq!(result.areas, vec![0.0]);
    assert_eq!(result.cumulative, vec![0.0]);
    assert_eq!(result.total, 0.0);
}

#[test]
fn test_scenario_right_single_interval() {
    let result = integrate(&f("x**2"), 0.0, 5.0, 1, Rule::Right).unwrap();
    assert_eq!(result.heights, vec![25.0]);
    assert_eq!(result.areas, vec![125.0]);
    assert_eq!(result.total, 125.0);
}

#[test]
fn test_scenario_trapezoid() {
    let result = integrate(&f("x**2"), 0.0, 5.0, 5, Rule::Trapezoid).unwrap();
    assert_eq!(result.step, 1.0);
    assert_eq!(result.partition, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(result.heights, vec![0.5, 2.5, 6.5, 12.5, 20.5]);
    assert_eq!(result.areas, result.heights);
    assert_eq!(result.total, 42.5);
}

#[test]
fn test_free_variable_falls_back_to_zero() {
    let (function, error) = normalize_or_zero("y+1");
    assert!(matches!(error, Some(ParseError::UnknownVariable { .. })));

    for rule in Rule::ALL {
        let result = integrate(&function, 0.0, 5.0, 10, rule).unwrap();
        assert_eq!(result.total, 0.0);
        assert!(result.heights.iter().all(|h| *h == 0.0));
    }
}

#[test]
fn test_zero_subdivisions_rejected() {
    for rule in Rule::ALL {
        assert!(matches!(
            integrate(&f("x"), 0.0, 1.0, 0, rule),
            Err(RiemannError::InvalidSubdivisionCount { n: 0, .. })
        ));
    }
}

#[test]
fn test_error_messages() {
    let err = integrate(&f("x"), 0.0, 1.0, 0, Rule::Left).unwrap_err();
    assert_eq!(err.to_string(), "Subdivision count must be at least 1, got 0");

    let err = Integrator::new()
        .max_subdivisions(500)
        .integrate(&f("x"), 0.0, 1.0, 600)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Subdivision count must be at least 1 and at most 500, got 600"
    );
}

#[test]
fn test_array_lengths() {
    for rule in Rule::ALL {
        for n in [1, 2, 7, 64, 333] {
            let result = integrate(&f("sin(x) + x"), -2.0, 3.0, n, rule).unwrap();
            assert_eq!(result.n(), n);
            assert_eq!(result.partition.len(), n + 1);
            assert_eq!(result.abscissas.len(), n);
            assert_eq!(result.heights.len(), n);
            assert_eq!(result.areas.len(), n);
            assert_eq!(result.cumulative.len(), n);
            assert_eq!(result.partition[0], -2.0);
            assert_eq!(result.partition[n], 3.0);
        }
    }
}

#[test]
fn test_convergence_for_square() {
    let exact = 125.0 / 3.0;
    let square = f("x**2");

    for rule in [Rule::Midpoint, Rule::Trapezoid] {
        let errors: Vec<f64> = [10, 100, 1000, 10_000]
            .into_iter()
            .map(|n| (integrate(&square, 0.0, 5.0, n, rule).unwrap().total - exact).abs())
            .collect();
        assert!(
            errors.windows(2).all(|w| w[1] < w[0]),
            "{rule} does not converge: {errors:?}"
        );
        assert!(errors[3] < 1e-6, "{rule} error too large: {}", errors[3]);
    }
}

#[test]
fn test_reruns_are_bit_identical() {
    let function = f("exp(-x^2) * cos(3x) + log(x + 10, 2)");
    for rule in Rule::ALL {
        let first = integrate(&function, -1.5, 2.5, 997, rule).unwrap();
        let second = integrate(&function, -1.5, 2.5, 997, rule).unwrap();
        assert_eq!(first.total.to_bits(), second.total.to_bits());
        assert_eq!(first, second);
    }
}

#[test]
fn test_sqrt_over_negative_half() {
    let result = integrate(&f("sqrt(x)"), -1.0, 1.0, 10, Rule::Midpoint).unwrap();
    assert_eq!(result.errors.len(), 5);
    for (i, height) in result.heights.iter().enumerate() {
        assert_eq!(height.is_finite(), i >= 5, "subinterval {i}");
    }
    let reported: Vec<usize> = result.errors.iter().map(|e| e.index).collect();
    assert_eq!(reported, vec![0, 1, 2, 3, 4]);
    assert!(result.errors.iter().all(|e| e.value.is_nan() && e.abscissa < 0.0));
}

#[test]
fn test_reciprocal_through_zero() {
    let result = integrate(&f("1/x"), -1.0, 1.0, 2, Rule::Left).unwrap();
    assert_eq!(result.heights[0], -1.0);
    assert_eq!(result.heights[1], f64::INFINITY);
    assert!(!result.total.is_finite());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].index, 1);
    assert_eq!(result.errors[0].abscissa, 0.0);
}

#[test]
fn test_reversed_bounds_flip_sign() {
    let function = f("x^3 - x + 2");
    for rule in [Rule::Midpoint, Rule::Trapezoid] {
        let forward = integrate(&function, 0.0, 2.0, 50, rule).unwrap();
        let backward = integrate(&function, 2.0, 0.0, 50, rule).unwrap();

        assert!(backward.step < 0.0);
        assert!(backward.partition.windows(2).all(|w| w[1] < w[0]));
        assert!(
            (forward.total + backward.total).abs() < 1e-12,
            "{rule}: {} vs {}",
            forward.total,
            backward.total
        );
    }
}

#[test]
fn test_degenerate_interval() {
    let result = integrate(&f("x^2 + 1"), 3.0, 3.0, 4, Rule::Right).unwrap();
    assert_eq!(result.step, 0.0);
    assert_eq!(result.total, 0.0);
    assert_eq!(result.heights, vec![10.0; 4]);
}

#[test]
fn test_parser_properties() {
    assert_eq!(parse("-x^2").unwrap(), parse("-(x^2)").unwrap());
    assert_eq!(parse("2x").unwrap(), parse("2*x").unwrap());
    assert_eq!(parse("x**2").unwrap(), parse("x^2").unwrap());
    assert!(parse("(x + 1").is_err());
    assert!(parse("x + 1)").is_err());
}

#[test]
fn test_negated_square_evaluates_negative() {
    assert_eq!(f("-x^2").eval(3.0), -9.0);
}

#[test]
fn test_rule_names_round_trip() {
    for rule in Rule::ALL {
        let parsed: Rule = rule.to_string().to_lowercase().parse().unwrap();
        assert_eq!(parsed, rule);
    }
    assert!("simpson".parse::<Rule>().is_err());
}

#[test]
fn test_pipeline_report() {
    let report = Pipeline::new()
        .curve_points(50)
        .run(&Request::new("x**2", 0.0, 5.0, 5, Rule::Trapezoid))
        .unwrap();
    assert_eq!(report.display.as_deref(), Some("x^{2}"));
    assert!(report.parse_error.is_none());
    assert_eq!(report.result.total, 42.5);
    assert_eq!(report.curve.len(), 50);
    assert_eq!(report.curve.ys[49], 25.0);

    let rows = report.result.rows();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[4].cumulative, 42.5);
}
