use crate::data::point_set::{FeatureKind, PointSet};
use csv::ReaderBuilder;
use nalgebra::{DMatrix, DVector};
use std::error::Error;
use std::io::Read;
use std::path::Path;

/// Loads a csv dataset into a point set. A header row is expected; every
/// column except the last is parsed as an `f64` feature, the last column
/// is the binary label (`true`/`false`/`1`/`0`, case-insensitive).
///
/// Feature kinds are inferred per column from the observed values: all
/// values in {0, 1} make a boolean column, all non-negative integers a
/// categorical one, anything else a real one.
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<PointSet<f64>, Box<dyn Error>> {
    let file = std::fs::File::open(path)?;
    from_reader(file)
}

/// Reads the csv dataset format of [`load_csv`] from any reader.
pub fn from_reader<R: Read>(source: R) -> Result<PointSet<f64>, Box<dyn Error>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(source);
    let mut features: Vec<Vec<f64>> = Vec::new();
    let mut labels = Vec::new();

    for result in reader.records() {
        let record = result?;
        if record.len() < 2 {
            return Err("Each record needs at least one feature and a label.".into());
        }
        let dimension = record.len() - 1;

        let mut feature_row = Vec::with_capacity(dimension);
        for feature in record.iter().take(dimension) {
            feature_row.push(feature.trim().parse::<f64>()?);
        }
        let label = record.get(dimension).ok_or("Missing label")?;

        features.push(feature_row);
        labels.push(parse_label(label)?);
    }

    if features.is_empty() {
        return Err("The dataset holds no records.".into());
    }

    let kinds = infer_kinds(&features);
    let feature_matrix =
        DMatrix::from_row_slice(features.len(), features[0].len(), &features.concat());
    let label_vector = DVector::from_vec(labels);

    PointSet::new(feature_matrix, label_vector, kinds)
}

fn parse_label(field: &str) -> Result<bool, Box<dyn Error>> {
    let field = field.trim();
    if field.eq_ignore_ascii_case("true") || field == "1" {
        Ok(true)
    } else if field.eq_ignore_ascii_case("false") || field == "0" {
        Ok(false)
    } else {
        Err(format!("Unrecognized label value: {}", field).into())
    }
}

fn infer_kinds(features: &[Vec<f64>]) -> Vec<FeatureKind> {
    (0..features[0].len())
        .map(|column| {
            let mut boolean = true;
            let mut categorical = true;
            for row in features {
                let value = row[column];
                if value != 0.0 && value != 1.0 {
                    boolean = false;
                }
                if value < 0.0 || value.fract() != 0.0 {
                    categorical = false;
                }
            }
            if boolean {
                FeatureKind::Boolean
            } else if categorical {
                FeatureKind::Categorical
            } else {
                FeatureKind::Real
            }
        })
        .collect()
}
