//! Scoring models
//!
//! [`Booster`] evaluates a gradient-boosted tree ensemble saved with
//! XGBoost's JSON model format. Training happens elsewhere; this module
//! only reads the artifact and turns a feature row into class
//! probabilities.

use crate::{features::FeatureRow, ModelError};
use ndarray::ArrayView1;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A loaded classifier returning one probability per class.
pub trait ScoringModel: Send + Sync {
    /// Class probabilities for a single feature row.
    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError>;
}

/// Somewhere a scoring model can be loaded from.
pub trait ModelSource: Send + Sync {
    /// Where the model lives, for error messages and logs.
    fn location(&self) -> String;

    /// Load a fresh model instance.
    fn load(&self) -> Result<Arc<dyn ScoringModel>, ModelError>;
}

/// XGBoost JSON model on disk.
#[derive(Debug, Clone)]
pub struct ModelFile {
    path: PathBuf,
}

impl ModelFile {
    /// Model stored at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Artifact path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ModelSource for ModelFile {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Arc<dyn ScoringModel>, ModelError> {
        Ok(Arc::new(Booster::load(&self.path)?))
    }
}

/// Output transform applied to the summed margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// `multi:softprob` / `multi:softmax`
    Softmax,
    /// `binary:logistic`, reported as `[1 - p, p]`
    Logistic,
}

impl Objective {
    fn from_name(name: &str) -> Result<Self, ModelError> {
        match name {
            "multi:softprob" | "multi:softmax" => Ok(Self::Softmax),
            "binary:logistic" => Ok(Self::Logistic),
            other => Err(ModelError::Unsupported {
                what: "objective",
                name: other.into(),
            }),
        }
    }
}

/// Regression tree in XGBoost's flat array layout.
#[derive(Debug, Clone)]
struct Tree {
    left: Vec<i32>,
    right: Vec<i32>,
    split_index: Vec<usize>,
    split_condition: Vec<f32>,
    default_left: Vec<bool>,
}

impl Tree {
    fn from_raw(raw: RawTree, num_feature: usize, id: usize) -> Result<Self, ModelError> {
        let n = raw.left_children.len();
        let lengths = [
            raw.right_children.len(),
            raw.split_indices.len(),
            raw.split_conditions.len(),
            raw.default_left.len(),
        ];
        if n == 0 || lengths.iter().any(|&l| l != n) {
            return Err(ModelError::Invalid(format!("tree {} has inconsistent node arrays", id)));
        }
        if !raw.split_type.is_empty() && raw.split_type.len() != n {
            return Err(ModelError::Invalid(format!("tree {} has inconsistent node arrays", id)));
        }
        // Categorical splits and vector leaves would be misread as numeric ones.
        if let Some(&kind) = raw.split_type.iter().find(|&&t| t != 0) {
            return Err(ModelError::Unsupported {
                what: "split type",
                name: kind.to_string(),
            });
        }
        if let Some(param) = &raw.tree_param {
            let size: usize = parse_param("size_leaf_vector", &param.size_leaf_vector)?;
            if size > 1 {
                return Err(ModelError::Unsupported {
                    what: "leaf vector size",
                    name: size.to_string(),
                });
            }
        }

        let mut split_index = Vec::with_capacity(n);
        for node in 0..n {
            let (l, r) = (raw.left_children[node], raw.right_children[node]);
            if l == -1 && r == -1 {
                split_index.push(0);
                continue;
            }
            let in_range = |c: i32| c > 0 && (c as usize) < n;
            if !in_range(l) || !in_range(r) {
                return Err(ModelError::Invalid(format!(
                    "tree {} node {} has out-of-range children ({}, {})",
                    id, node, l, r
                )));
            }
            let feature = raw.split_indices[node];
            if feature < 0 || feature as usize >= num_feature {
                return Err(ModelError::Invalid(format!(
                    "tree {} node {} splits on feature {} of {}",
                    id, node, feature, num_feature
                )));
            }
            split_index.push(feature as usize);
        }

        Ok(Self {
            left: raw.left_children,
            right: raw.right_children,
            split_index,
            split_condition: raw.split_conditions,
            default_left: raw.default_left.into_iter().map(Flag::is_set).collect(),
        })
    }

    /// Leaf value reached by `x`.
    fn leaf(&self, x: &ArrayView1<'_, f32>) -> Result<f32, ModelError> {
        let mut node = 0usize;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..=self.left.len() {
            if self.left[node] == -1 {
                return Ok(self.split_condition[node]);
            }
            let value = x[self.split_index[node]];
            let go_left = if value.is_nan() {
                self.default_left[node]
            } else {
                value < self.split_condition[node]
            };
            node = (if go_left { self.left[node] } else { self.right[node] }) as usize;
        }
        Err(ModelError::Invalid("tree contains a cycle".into()))
    }
}

/// Gradient-boosted tree ensemble.
#[derive(Debug, Clone)]
pub struct Booster {
    objective: Objective,
    base_score: f32,
    num_group: usize,
    num_feature: usize,
    feature_names: Option<Vec<String>>,
    trees: Vec<Tree>,
    tree_group: Vec<usize>,
    tree_weight: Vec<f32>,
}

impl Booster {
    /// Load a booster saved with `save_model("*.json")`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        tracing::debug!("Loading XGBoost model from {}", path.display());
        let content = std::fs::read(path)?;
        Self::from_json_slice(&content)
    }

    /// Parse a booster from its JSON document.
    pub fn from_json_slice(json: &[u8]) -> Result<Self, ModelError> {
        let raw: RawModel = serde_json::from_slice(json)?;
        Self::from_raw(raw.learner)
    }

    fn from_raw(learner: RawLearner) -> Result<Self, ModelError> {
        let params = &learner.learner_model_param;
        let objective = Objective::from_name(&learner.objective.name)?;
        let base_score: f32 = parse_param("base_score", params.base_score.trim_matches(|c: char| c == '[' || c == ']'))?;
        let num_class: usize = parse_param("num_class", &params.num_class)?;
        let num_feature: usize = parse_param("num_feature", &params.num_feature)?;
        let num_target: usize = parse_param("num_target", &params.num_target)?;
        let num_group = num_class.max(1);

        if num_target > 1 {
            return Err(ModelError::Unsupported {
                what: "target count",
                name: num_target.to_string(),
            });
        }

        if objective == Objective::Logistic && num_group != 1 {
            return Err(ModelError::Invalid(format!(
                "binary:logistic model declares {} classes",
                num_class
            )));
        }

        let feature_names = match learner.feature_names {
            names if names.is_empty() => None,
            names if names.len() == num_feature => Some(names),
            names => {
                return Err(ModelError::Invalid(format!(
                    "{} feature names for {} features",
                    names.len(),
                    num_feature
                )))
            }
        };

        let (gbtree, weights) = learner.gradient_booster.into_gbtree()?;
        if gbtree.tree_info.len() != gbtree.trees.len() {
            return Err(ModelError::Invalid(format!(
                "{} trees but {} tree_info entries",
                gbtree.trees.len(),
                gbtree.tree_info.len()
            )));
        }

        let tree_group = gbtree
            .tree_info
            .iter()
            .map(|&g| match usize::try_from(g) {
                Ok(g) if g < num_group => Ok(g),
                _ => Err(ModelError::Invalid(format!("tree assigned to unknown class {}", g))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tree_weight = match weights {
            Some(w) if w.len() == gbtree.trees.len() => w,
            Some(w) => {
                return Err(ModelError::Invalid(format!(
                    "{} dart weights for {} trees",
                    w.len(),
                    gbtree.trees.len()
                )))
            }
            None => vec![1.0; gbtree.trees.len()],
        };

        let trees = gbtree
            .trees
            .into_iter()
            .enumerate()
            .map(|(id, raw)| Tree::from_raw(raw, num_feature, id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            objective,
            base_score,
            num_group,
            num_feature,
            feature_names,
            trees,
            tree_group,
            tree_weight,
        })
    }

    /// Number of input features
    pub fn num_feature(&self) -> usize {
        self.num_feature
    }

    /// Number of probabilities returned by [`ScoringModel::predict_proba`]
    pub fn num_class(&self) -> usize {
        match self.objective {
            Objective::Softmax => self.num_group,
            Objective::Logistic => 2,
        }
    }

    /// Feature names recorded at training time
    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Output transform
    pub fn objective(&self) -> Objective {
        self.objective
    }

    /// Raw per-group margins before the output transform.
    pub fn predict_margin(&self, row: &FeatureRow) -> Result<Vec<f32>, ModelError> {
        self.check_row(row)?;
        let x = row.values();
        let base = match self.objective {
            Objective::Softmax => self.base_score,
            Objective::Logistic => logit(self.base_score),
        };
        let mut margins = vec![base; self.num_group];
        for ((tree, &group), &weight) in self.trees.iter().zip(&self.tree_group).zip(&self.tree_weight) {
            margins[group] += weight * tree.leaf(&x)?;
        }
        Ok(margins)
    }

    fn check_row(&self, row: &FeatureRow) -> Result<(), ModelError> {
        if let Some(expected) = &self.feature_names {
            if expected.as_slice() != row.columns() {
                return Err(ModelError::FeatureNames {
                    expected: expected.clone(),
                    found: row.columns().to_vec(),
                });
            }
        }
        if row.width() != self.num_feature {
            return Err(ModelError::Shape {
                expected: self.num_feature,
                found: row.width(),
            });
        }
        Ok(())
    }
}

impl ScoringModel for Booster {
    fn predict_proba(&self, row: &FeatureRow) -> Result<Vec<f64>, ModelError> {
        let margins = self.predict_margin(row)?;
        Ok(match self.objective {
            Objective::Softmax => softmax(&margins),
            Objective::Logistic => {
                let p = sigmoid(f64::from(margins[0]));
                vec![1.0 - p, p]
            }
        })
    }
}

fn softmax(margins: &[f32]) -> Vec<f64> {
    let max = margins.iter().copied().fold(f32::NEG_INFINITY, f32::max) as f64;
    let exp: Vec<f64> = margins.iter().map(|&m| (f64::from(m) - max).exp()).collect();
    let sum: f64 = exp.iter().sum();
    exp.into_iter().map(|e| e / sum).collect()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn logit(p: f32) -> f32 {
    (p / (1.0 - p)).ln()
}

fn parse_param<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ModelError> {
    value
        .trim()
        .parse()
        .map_err(|_| ModelError::Invalid(format!("bad {} value {:?}", name, value)))
}

// Serialized layout. Only the fields needed for inference are read.

#[derive(Deserialize)]
struct RawModel {
    learner: RawLearner,
}

#[derive(Deserialize)]
struct RawLearner {
    #[serde(default)]
    feature_names: Vec<String>,
    gradient_booster: RawGradientBooster,
    learner_model_param: RawModelParam,
    objective: RawObjective,
}

#[derive(Deserialize)]
struct RawModelParam {
    base_score: String,
    #[serde(default = "zero")]
    num_class: String,
    num_feature: String,
    #[serde(default = "one")]
    num_target: String,
}

fn zero() -> String {
    "0".into()
}

fn one() -> String {
    "1".into()
}

#[derive(Deserialize)]
struct RawObjective {
    name: String,
}

#[derive(Deserialize)]
struct RawGradientBooster {
    name: String,
    #[serde(default)]
    model: Option<RawGbtree>,
    #[serde(default)]
    gbtree: Option<Box<RawGradientBooster>>,
    #[serde(default)]
    weight_drop: Vec<f32>,
}

impl RawGradientBooster {
    /// Trees plus optional per-tree weights (dart).
    fn into_gbtree(self) -> Result<(RawGbtree, Option<Vec<f32>>), ModelError> {
        match (self.name.as_str(), self.model, self.gbtree) {
            ("gbtree", Some(model), _) => Ok((model, None)),
            ("dart", _, Some(inner)) => {
                let (model, _) = inner.into_gbtree()?;
                Ok((model, Some(self.weight_drop)))
            }
            ("gbtree", None, _) | ("dart", _, None) => {
                Err(ModelError::Invalid(format!("{} booster without trees", self.name)))
            }
            (other, _, _) => Err(ModelError::Unsupported {
                what: "booster",
                name: other.into(),
            }),
        }
    }
}

#[derive(Deserialize)]
struct RawGbtree {
    trees: Vec<RawTree>,
    tree_info: Vec<i64>,
}

#[derive(Deserialize)]
struct RawTree {
    left_children: Vec<i32>,
    right_children: Vec<i32>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f32>,
    default_left: Vec<Flag>,
    /// 0 = numerical, 1 = categorical. Older artifacts omit it.
    #[serde(default)]
    split_type: Vec<i64>,
    #[serde(default)]
    tree_param: Option<RawTreeParam>,
}

#[derive(Deserialize)]
struct RawTreeParam {
    #[serde(default = "one")]
    size_leaf_vector: String,
}

/// `default_left` is written as 0/1 by some versions and as bools by others.
#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(self) -> bool {
        match self {
            Flag::Bool(b) => b,
            Flag::Int(i) => i != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{RiskInput, FEATURE_COLUMNS};
    use serde_json::{json, Value};

    fn stump(feature: usize, threshold: f32, left: f32, right: f32, default_left: bool) -> Value {
        json!({
            "base_weights": [0.0, left, right],
            "default_left": [default_left as i32, 0, 0],
            "id": 0,
            "left_children": [1, -1, -1],
            "right_children": [2, -1, -1],
            "parents": [2147483647, 0, 0],
            "split_conditions": [threshold, left, right],
            "split_indices": [feature, 0, 0],
            "split_type": [0, 0, 0],
            "tree_param": { "num_deleted": "0", "num_feature": "9", "num_nodes": "3", "size_leaf_vector": "1" }
        })
    }

    fn model(objective: &str, num_class: &str, trees: Vec<Value>, tree_info: Vec<i64>) -> Value {
        json!({
            "learner": {
                "attributes": {},
                "feature_names": FEATURE_COLUMNS,
                "feature_types": vec!["int"; 9],
                "gradient_booster": {
                    "model": {
                        "gbtree_model_param": { "num_parallel_tree": "1", "num_trees": trees.len().to_string() },
                        "iteration_indptr": [0, trees.len()],
                        "tree_info": tree_info,
                        "trees": trees
                    },
                    "name": "gbtree"
                },
                "learner_model_param": {
                    "base_score": "5E-1",
                    "boost_from_average": "1",
                    "num_class": num_class,
                    "num_feature": "9",
                    "num_target": "1"
                },
                "objective": { "name": objective, "softmax_multiclass_param": { "num_class": num_class } }
            },
            "version": [2, 0, 3]
        })
    }

    fn three_class() -> Booster {
        let doc = model(
            "multi:softprob",
            "3",
            vec![
                stump(4, 40.0, 0.5, -0.5, false),
                stump(0, 3.0, -0.25, 0.75, false),
                stump(8, 2.0, -0.5, 1.0, true),
            ],
            vec![0, 1, 2],
        );
        Booster::from_json_slice(doc.to_string().as_bytes()).unwrap()
    }

    fn expected_softmax(margins: [f64; 3]) -> Vec<f64> {
        let sum: f64 = margins.iter().map(|m| m.exp()).sum();
        margins.iter().map(|m| m.exp() / sum).collect()
    }

    #[test]
    fn test_softprob_prediction() {
        let booster = three_class();
        let probs = booster.predict_proba(&RiskInput::new(1, 1, 1).to_feature_row()).unwrap();

        // speed 30 < 40, light 1 < 3, casualties 1 < 2: all left
        let expected = expected_softmax([1.0, 0.25, 0.0]);
        assert_eq!(probs.len(), 3);
        for (p, e) in probs.iter().zip(expected) {
            assert!((p - e).abs() < 1e-6);
        }
    }

    #[test]
    fn test_split_is_strict_less_than() {
        let booster = three_class();
        let mut input = RiskInput::new(3, 1, 1);
        input.speed_limit = 40;
        input.number_of_casualties = 2;

        let margins = booster.predict_margin(&input.to_feature_row()).unwrap();
        assert_eq!(margins, vec![0.0, 1.25, 1.5]);
    }

    #[test]
    fn test_missing_value_follows_default_direction() {
        let booster = three_class();
        let mut values: Vec<f32> = RiskInput::new(1, 1, 1).to_vector().iter().map(|&v| v as f32).collect();
        values[4] = f32::NAN;
        values[8] = f32::NAN;
        let columns = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
        let row = FeatureRow::new(columns, values).unwrap();

        let margins = booster.predict_margin(&row).unwrap();
        assert_eq!(margins[0], 0.0);
        assert_eq!(margins[2], 0.0);
    }

    #[test]
    fn test_trees_accumulate_per_class() {
        let doc = model(
            "multi:softprob",
            "3",
            vec![
                stump(4, 40.0, 0.5, -0.5, false),
                stump(0, 3.0, -0.25, 0.75, false),
                stump(8, 2.0, -0.5, 1.0, false),
                stump(4, 100.0, 0.25, 0.0, false),
            ],
            vec![0, 1, 2, 0],
        );
        let booster = Booster::from_json_slice(doc.to_string().as_bytes()).unwrap();
        let margins = booster.predict_margin(&RiskInput::new(1, 1, 1).to_feature_row()).unwrap();

        assert_eq!(margins[0], 1.25);
    }

    #[test]
    fn test_binary_logistic() {
        let mut doc = model("binary:logistic", "0", vec![stump(4, 40.0, 0.0, 2.0, false)], vec![0]);
        doc["learner"]["learner_model_param"]["base_score"] = json!("[5E-1]");
        let booster = Booster::from_json_slice(doc.to_string().as_bytes()).unwrap();

        let probs = booster.predict_proba(&RiskInput::new(1, 1, 1).to_feature_row()).unwrap();
        assert_eq!(booster.num_class(), 2);
        assert!((probs[0] - 0.5).abs() < 1e-6);
        assert!((probs[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_dart_weights() {
        let mut doc = model("multi:softprob", "3", vec![stump(4, 40.0, 1.0, 1.0, false)], vec![0]);
        let gbtree = doc["learner"]["gradient_booster"].take();
        doc["learner"]["gradient_booster"] = json!({
            "name": "dart",
            "gbtree": gbtree,
            "weight_drop": [0.5]
        });
        let booster = Booster::from_json_slice(doc.to_string().as_bytes()).unwrap();

        let margins = booster.predict_margin(&RiskInput::new(1, 1, 1).to_feature_row()).unwrap();
        assert_eq!(margins, vec![1.0, 0.5, 0.5]);
    }

    #[test]
    fn test_feature_name_mismatch() {
        let booster = three_class();
        let mut columns: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
        columns.swap(0, 1);
        let row = FeatureRow::new(columns, vec![1.0; 9]).unwrap();

        let err = booster.predict_proba(&row).unwrap_err();
        assert!(matches!(err, ModelError::FeatureNames { .. }));
        assert!(err.to_string().starts_with("feature_names mismatch"));
    }

    #[test]
    fn test_shape_mismatch_without_names() {
        let mut doc = model("multi:softprob", "3", vec![stump(4, 40.0, 0.5, -0.5, false)], vec![0]);
        doc["learner"]["feature_names"] = json!([]);
        let booster = Booster::from_json_slice(doc.to_string().as_bytes()).unwrap();
        let row = FeatureRow::new(vec!["a".into(), "b".into()], vec![1.0, 2.0]).unwrap();

        let err = booster.predict_proba(&row).unwrap_err();
        assert!(matches!(err, ModelError::Shape { expected: 9, found: 2 }));
    }

    #[test]
    fn test_malformed_models_rejected() {
        assert!(matches!(Booster::from_json_slice(b"{}"), Err(ModelError::Json(_))));

        let unsupported = model("reg:squarederror", "0", vec![stump(0, 1.0, 0.0, 0.0, false)], vec![0]);
        assert!(matches!(
            Booster::from_json_slice(unsupported.to_string().as_bytes()),
            Err(ModelError::Unsupported { what: "objective", .. })
        ));

        let mut bad_child = stump(0, 1.0, 0.0, 0.0, false);
        bad_child["right_children"] = json!([7, -1, -1]);
        let doc = model("multi:softprob", "3", vec![bad_child], vec![0]);
        assert!(matches!(
            Booster::from_json_slice(doc.to_string().as_bytes()),
            Err(ModelError::Invalid(_))
        ));

        let doc = model("multi:softprob", "3", vec![stump(12, 1.0, 0.0, 0.0, false)], vec![0]);
        assert!(Booster::from_json_slice(doc.to_string().as_bytes()).is_err());

        let doc = model("multi:softprob", "3", vec![stump(0, 1.0, 0.0, 0.0, false)], vec![5]);
        assert!(Booster::from_json_slice(doc.to_string().as_bytes()).is_err());

        let mut categorical = stump(0, 1.0, 0.0, 0.0, false);
        categorical["split_type"] = json!([1, 0, 0]);
        let doc = model("multi:softprob", "3", vec![categorical], vec![0]);
        assert!(matches!(
            Booster::from_json_slice(doc.to_string().as_bytes()),
            Err(ModelError::Unsupported { what: "split type", .. })
        ));

        let mut short_types = stump(0, 1.0, 0.0, 0.0, false);
        short_types["split_type"] = json!([0]);
        let doc = model("multi:softprob", "3", vec![short_types], vec![0]);
        assert!(matches!(
            Booster::from_json_slice(doc.to_string().as_bytes()),
            Err(ModelError::Invalid(_))
        ));

        let mut vector_leaf = stump(0, 1.0, 0.0, 0.0, false);
        vector_leaf["tree_param"]["size_leaf_vector"] = json!("3");
        let doc = model("multi:softprob", "3", vec![vector_leaf], vec![0]);
        assert!(matches!(
            Booster::from_json_slice(doc.to_string().as_bytes()),
            Err(ModelError::Unsupported { what: "leaf vector size", .. })
        ));

        let mut multi_target = model("multi:softprob", "3", vec![stump(0, 1.0, 0.0, 0.0, false)], vec![0]);
        multi_target["learner"]["learner_model_param"]["num_target"] = json!("2");
        assert!(matches!(
            Booster::from_json_slice(multi_target.to_string().as_bytes()),
            Err(ModelError::Unsupported { what: "target count", .. })
        ));
    }

    #[test]
    fn test_legacy_tree_fields_optional() {
        let mut tree = stump(4, 40.0, 0.5, -0.5, false);
        let fields = tree.as_object_mut().unwrap();
        fields.remove("split_type");
        fields.remove("tree_param");
        let mut doc = model("multi:softprob", "3", vec![tree], vec![0]);
        doc["learner"]["learner_model_param"]
            .as_object_mut()
            .unwrap()
            .remove("num_target");
        assert!(Booster::from_json_slice(doc.to_string().as_bytes()).is_ok());
    }

    #[test]
    fn test_bool_default_left_accepted() {
        let mut tree = stump(4, 40.0, 0.5, -0.5, false);
        tree["default_left"] = json!([true, false, false]);
        let doc = model("multi:softprob", "3", vec![tree], vec![0]);
        assert!(Booster::from_json_slice(doc.to_string().as_bytes()).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let source = ModelFile::new("/nonexistent/accident_model.json");
        let err = source.load().err().unwrap();
        assert!(matches!(err, ModelError::Io(_)));
    }
}
