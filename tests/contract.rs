//! Request/response JSON contract.

#![cfg(feature = "serde")]

use serde_json::{json, Value};
use u_mclp::{solve, OptimizationRequest, OptimizationResult, SolveError};

fn scenario_json() -> Value {
    json!({
        "points": [[0.0, 0.0], [1.0, 0.0], [5.0, 5.0]],
        "demands": [1.0, 2.0, 3.0],
        "facilities": [0, 1, 2],
        "max_facilities": 1,
        "coverage_radius": 1.5
    })
}

#[test]
fn parses_request_shape() {
    let req: OptimizationRequest = serde_json::from_value(scenario_json()).unwrap();

    assert_eq!(req.points.len(), 3);
    assert_eq!(req.points[1].x, 1.0);
    assert_eq!(req.facilities, vec![0, 1, 2]);
    assert_eq!(req.max_facilities, 1);
    assert_eq!(req.coverage_radius, 1.5);
}

#[test]
fn integer_coordinates_are_accepted() {
    let mut raw = scenario_json();
    raw["points"] = json!([[0, 0], [1, 0], [5, 5]]);
    let req: OptimizationRequest = serde_json::from_value(raw).unwrap();
    assert_eq!(req.points[2].y, 5.0);
}

#[test]
fn result_uses_capitalized_fitness_key() {
    let req: OptimizationRequest = serde_json::from_value(scenario_json()).unwrap();
    let result = solve(&req).unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["Fitness"], json!(3.0));
    assert_eq!(value["solution"], json!([0]));
    assert!(value["id"].is_u64());
    assert!(value["target"].is_array());
    assert!(value.get("fitness").is_none());
}

#[test]
fn result_round_trips() {
    let result = OptimizationResult {
        id: 12,
        target: vec![1.0, 2.5],
        fitness: 2.5,
        solution: vec![4, 9],
    };
    let text = serde_json::to_string(&result).unwrap();
    assert_eq!(
        text,
        r#"{"id":12,"target":[1.0,2.5],"Fitness":2.5,"solution":[4,9]}"#
    );
    let back: OptimizationResult = serde_json::from_str(&text).unwrap();
    assert_eq!(back, result);
}

#[test]
fn negative_facility_index_is_shape_error() {
    let mut raw = scenario_json();
    raw["facilities"] = json!([0, -1]);
    let req: OptimizationRequest = serde_json::from_value(raw).unwrap();

    let err = solve(&req).unwrap_err();
    assert!(matches!(err, SolveError::InputShape(_)));
    assert_eq!(err.http_status(), 400);
}

#[test]
fn negative_demand_is_range_error() {
    let mut raw = scenario_json();
    raw["demands"] = json!([1.0, -2.0, 3.0]);
    let req: OptimizationRequest = serde_json::from_value(raw).unwrap();

    let err = solve(&req).unwrap_err();
    assert!(matches!(err, SolveError::InputRange(_)));
    assert!(err.to_string().starts_with("input range error"));
}

#[test]
fn empty_facilities_returns_empty_solution() {
    let mut raw = scenario_json();
    raw["facilities"] = json!([]);
    let req: OptimizationRequest = serde_json::from_value(raw).unwrap();

    let result = solve(&req).unwrap();
    assert!(result.solution.is_empty());
    assert_eq!(result.fitness, 0.0);
}

#[test]
fn budget_above_candidates_opens_all_useful_sites() {
    let mut raw = scenario_json();
    raw["max_facilities"] = json!(10);
    let req: OptimizationRequest = serde_json::from_value(raw).unwrap();

    let result = solve(&req).unwrap();
    // Site 0 covers {0,1}, site 2 covers {2}; site 1 adds nothing.
    assert_eq!(result.solution, vec![0, 2]);
    assert_eq!(result.fitness, 6.0);
}
