//! Shared fixtures: a small three-class accident model in XGBoost JSON form.

#![allow(dead_code)]

use risk_scoring::{RiskInput, FEATURE_COLUMNS};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

struct Node {
    left: i32,
    right: i32,
    feature: usize,
    value: f32,
}

fn split(feature: usize, threshold: f32, left: i32, right: i32) -> Node {
    Node { left, right, feature, value: threshold }
}

fn leaf(value: f32) -> Node {
    Node { left: -1, right: -1, feature: 0, value }
}

fn tree(id: usize, nodes: Vec<Node>) -> Value {
    let n = nodes.len();
    json!({
        "base_weights": nodes.iter().map(|n| n.value).collect::<Vec<_>>(),
        "categories": [],
        "categories_nodes": [],
        "categories_segments": [],
        "categories_sizes": [],
        "default_left": vec![0; n],
        "id": id,
        "left_children": nodes.iter().map(|n| n.left).collect::<Vec<_>>(),
        "loss_changes": vec![0.0; n],
        "parents": vec![2147483647; n],
        "right_children": nodes.iter().map(|n| n.right).collect::<Vec<_>>(),
        "split_conditions": nodes.iter().map(|n| n.value).collect::<Vec<_>>(),
        "split_indices": nodes.iter().map(|n| n.feature).collect::<Vec<_>>(),
        "split_type": vec![0; n],
        "sum_hessian": vec![1.0; n],
        "tree_param": {
            "num_deleted": "0",
            "num_feature": "9",
            "num_nodes": n.to_string(),
            "size_leaf_vector": "1"
        }
    })
}

/// Three trees, one per severity class.
///
/// - low: `speed_limit < 40` → 0.6, else `urban_or_rural_area < 2` → 0.1 / -0.3
/// - medium: `light_conditions < 4` → -0.2 / 0.4
/// - high: `number_of_casualties < 2` → -0.5, else `number_of_vehicles < 3` → 0.3 / 0.9
pub fn accident_model() -> Value {
    let trees = vec![
        tree(0, vec![split(4, 40.0, 1, 2), leaf(0.6), split(5, 2.0, 3, 4), leaf(0.1), leaf(-0.3)]),
        tree(1, vec![split(0, 4.0, 1, 2), leaf(-0.2), leaf(0.4)]),
        tree(2, vec![split(8, 2.0, 1, 2), leaf(-0.5), split(7, 3.0, 3, 4), leaf(0.3), leaf(0.9)]),
    ];
    json!({
        "learner": {
            "attributes": { "scikit_learn": "{\"_estimator_type\": \"classifier\"}" },
            "feature_names": FEATURE_COLUMNS,
            "feature_types": vec!["int"; 9],
            "gradient_booster": {
                "model": {
                    "gbtree_model_param": { "num_parallel_tree": "1", "num_trees": "3" },
                    "iteration_indptr": [0, 3],
                    "tree_info": [0, 1, 2],
                    "trees": trees
                },
                "name": "gbtree"
            },
            "learner_model_param": {
                "base_score": "5E-1",
                "boost_from_average": "1",
                "num_class": "3",
                "num_feature": "9",
                "num_target": "1"
            },
            "objective": {
                "name": "multi:softprob",
                "softmax_multiclass_param": { "num_class": "3" }
            }
        },
        "version": [2, 0, 3]
    })
}

/// Write the fixture model into `dir`.
pub fn write_model(dir: &Path) -> PathBuf {
    let path = dir.join("accident_model.json");
    std::fs::write(&path, accident_model().to_string()).unwrap();
    path
}

/// Probabilities the fixture model should produce, computed independently.
pub fn expected_probabilities(input: &RiskInput) -> [f64; 3] {
    let low: f32 = if input.speed_limit < 40 {
        0.6
    } else if input.urban_or_rural_area < 2 {
        0.1
    } else {
        -0.3
    };
    let medium: f32 = if input.light_conditions < 4 { -0.2 } else { 0.4 };
    let high: f32 = if input.number_of_casualties < 2 {
        -0.5
    } else if input.number_of_vehicles < 3 {
        0.3
    } else {
        0.9
    };

    let margins = [low, medium, high].map(|leaf| 0.5 + f64::from(leaf));
    let sum: f64 = margins.iter().map(|m| m.exp()).sum();
    margins.map(|m| m.exp() / sum)
}
