//! Statistical weather estimator
//!
//! A Gaussian naive Bayes classifier (weather label) and a linear
//! least-squares regressor (temperature) sharing one scaled feature vector.
//! Both are trained offline on synthetic samples generated by running the
//! rule model over a multi-year, multi-city grid, so the estimator can only
//! ever approximate the rule model; it exists to interpolate across the rule
//! cascade's discrete thresholds. After training it is pure inference.

use chrono::{Datelike, NaiveDate};
use statrs::distribution::{Continuous, Normal};
use tracing::{debug, info};

use crate::catalog::GeographyCatalog;
use crate::error::{AppError, AppResult};
use crate::services::climate::ClimateRuleModel;
use shared::GeoCity;

const FEATURE_COUNT: usize = 7;

/// Shared feature vector for both models
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub population: f64,
    pub month: f64,
    pub day_of_week: f64,
    pub day_of_year: f64,
}

impl FeatureVector {
    pub fn for_city(city: &GeoCity, date: NaiveDate) -> Self {
        Self {
            latitude: city.latitude,
            longitude: city.longitude,
            elevation_m: city.elevation_m,
            population: city.population as f64,
            month: date.month() as f64,
            day_of_week: date.weekday().num_days_from_monday() as f64,
            day_of_year: date.ordinal() as f64,
        }
    }

    fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.latitude,
            self.longitude,
            self.elevation_m,
            self.population,
            self.month,
            self.day_of_week,
            self.day_of_year,
        ]
    }
}

/// Inference result from the classifier/regressor pair
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorPrediction {
    pub weather_label: String,
    /// Posterior probability of the predicted label
    pub confidence: f64,
    pub temperature_c: f64,
}

/// Fitted per-feature normalizer (zero mean, unit variance)
#[derive(Debug, Clone)]
struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    std: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    fn fit(samples: &[[f64; FEATURE_COUNT]]) -> Self {
        let n = samples.len().max(1) as f64;
        let mut mean = [0.0; FEATURE_COUNT];
        for s in samples {
            for (m, v) in mean.iter_mut().zip(s) {
                *m += v / n;
            }
        }
        let mut std = [0.0; FEATURE_COUNT];
        for s in samples {
            for i in 0..FEATURE_COUNT {
                std[i] += (s[i] - mean[i]).powi(2) / n;
            }
        }
        for s in &mut std {
            *s = s.sqrt().max(1e-9);
        }
        Self { mean, std }
    }

    fn transform(&self, features: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (features[i] - self.mean[i]) / self.std[i];
        }
        out
    }
}

/// Per-label Gaussian statistics for the naive Bayes classifier
#[derive(Debug, Clone)]
struct ClassModel {
    label: String,
    log_prior: f64,
    feature_normals: Vec<Normal>,
}

/// Trained classifier + regressor pair behind a predict contract
#[derive(Debug, Clone)]
pub struct StatisticalEstimator {
    scaler: StandardScaler,
    classes: Vec<ClassModel>,
    /// Regressor weights: one per scaled feature plus a trailing intercept
    regression_weights: [f64; FEATURE_COUNT + 1],
}

impl StatisticalEstimator {
    /// Train both models on a synthetic rule-model grid over the catalog
    pub fn train(
        catalog: &GeographyCatalog,
        rule_model: &ClimateRuleModel,
        from_year: i32,
        to_year: i32,
    ) -> AppResult<Self> {
        let mut features = Vec::new();
        let mut weather_targets = Vec::new();
        let mut temperature_targets = Vec::new();

        let mut cities: Vec<&GeoCity> = catalog.iter().collect();
        cities.sort_by(|a, b| a.name.cmp(&b.name));

        for city in cities {
            for year in from_year..=to_year {
                for month in 1..=12u32 {
                    for day in 1..=28u32 {
                        let date = NaiveDate::from_ymd_opt(year, month, day)
                            .ok_or_else(|| AppError::ModelInference("bad grid date".into()))?;
                        let sample = rule_model.predict(city, month, date.ordinal());
                        features.push(FeatureVector::for_city(city, date).as_array());
                        weather_targets.push(sample.weather_label);
                        temperature_targets.push(sample.temperature_c);
                    }
                }
            }
        }

        if features.is_empty() {
            return Err(AppError::ModelInference(
                "empty training grid: catalog has no cities".into(),
            ));
        }

        info!(samples = features.len(), "Training statistical estimator");

        let scaler = StandardScaler::fit(&features);
        let scaled: Vec<[f64; FEATURE_COUNT]> =
            features.iter().map(|f| scaler.transform(f)).collect();

        let classes = fit_naive_bayes(&scaled, &weather_targets)?;
        let regression_weights = fit_least_squares(&scaled, &temperature_targets)?;

        debug!(classes = classes.len(), "Estimator training complete");

        Ok(Self {
            scaler,
            classes,
            regression_weights,
        })
    }

    /// Pure inference: (label, confidence, temperature)
    pub fn predict(&self, features: &FeatureVector) -> AppResult<EstimatorPrediction> {
        if self.classes.is_empty() {
            return Err(AppError::ModelInference("classifier has no classes".into()));
        }

        let x = self.scaler.transform(&features.as_array());

        // Log-posterior per class, then softmax for a calibrated confidence
        let mut log_posts = Vec::with_capacity(self.classes.len());
        for class in &self.classes {
            let mut lp = class.log_prior;
            for (normal, value) in class.feature_normals.iter().zip(x.iter()) {
                lp += normal.ln_pdf(*value);
            }
            log_posts.push(lp);
        }
        let max_lp = log_posts.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut total = 0.0;
        let mut posts = Vec::with_capacity(log_posts.len());
        for lp in &log_posts {
            let p = (lp - max_lp).exp();
            posts.push(p);
            total += p;
        }

        let (best_idx, _) = posts
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .ok_or_else(|| AppError::ModelInference("empty posterior".into()))?;
        let confidence = posts[best_idx] / total;

        let mut temperature = self.regression_weights[FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            temperature += self.regression_weights[i] * x[i];
        }

        Ok(EstimatorPrediction {
            weather_label: self.classes[best_idx].label.clone(),
            confidence,
            temperature_c: (temperature * 10.0).round() / 10.0,
        })
    }
}

fn fit_naive_bayes(
    scaled: &[[f64; FEATURE_COUNT]],
    targets: &[String],
) -> AppResult<Vec<ClassModel>> {
    let total = scaled.len() as f64;
    let mut by_label: std::collections::BTreeMap<&str, Vec<usize>> = Default::default();
    for (i, label) in targets.iter().enumerate() {
        by_label.entry(label.as_str()).or_default().push(i);
    }

    let mut classes = Vec::with_capacity(by_label.len());
    for (label, indices) in by_label {
        let n = indices.len() as f64;
        let mut normals = Vec::with_capacity(FEATURE_COUNT);
        for f in 0..FEATURE_COUNT {
            let mean = indices.iter().map(|&i| scaled[i][f]).sum::<f64>() / n;
            let var = indices
                .iter()
                .map(|&i| (scaled[i][f] - mean).powi(2))
                .sum::<f64>()
                / n;
            let std = var.sqrt().max(1e-3);
            let normal = Normal::new(mean, std)
                .map_err(|e| AppError::ModelInference(format!("class {label}: {e}")))?;
            normals.push(normal);
        }
        classes.push(ClassModel {
            label: label.to_string(),
            log_prior: (n / total).ln(),
            feature_normals: normals,
        });
    }
    Ok(classes)
}

/// Ridge-stabilized normal equations solved by Gaussian elimination
fn fit_least_squares(
    scaled: &[[f64; FEATURE_COUNT]],
    targets: &[f64],
) -> AppResult<[f64; FEATURE_COUNT + 1]> {
    const D: usize = FEATURE_COUNT + 1;
    let mut a = [[0.0f64; D]; D];
    let mut b = [0.0f64; D];

    for (x, &y) in scaled.iter().zip(targets) {
        let mut row = [0.0f64; D];
        row[..FEATURE_COUNT].copy_from_slice(x);
        row[FEATURE_COUNT] = 1.0;
        for i in 0..D {
            for j in 0..D {
                a[i][j] += row[i] * row[j];
            }
            b[i] += row[i] * y;
        }
    }
    for (i, row) in a.iter_mut().enumerate() {
        row[i] += 1e-6;
    }

    // Gaussian elimination with partial pivoting
    for col in 0..D {
        let pivot = (col..D)
            .max_by(|&r1, &r2| a[r1][col].abs().total_cmp(&a[r2][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(AppError::ModelInference(
                "singular system in temperature regression".into(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in (col + 1)..D {
            let factor = a[row][col] / a[col][col];
            for k in col..D {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }
    let mut weights = [0.0f64; D];
    for row in (0..D).rev() {
        let mut acc = b[row];
        for k in (row + 1)..D {
            acc -= a[row][k] * weights[k];
        }
        weights[row] = acc / a[row][row];
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::GeographyCatalog;

    fn trained() -> StatisticalEstimator {
        // One training year keeps the unit test fast
        StatisticalEstimator::train(
            &GeographyCatalog::builtin(),
            &ClimateRuleModel::new(),
            2024,
            2024,
        )
        .unwrap()
    }

    #[test]
    fn prediction_confidence_is_a_probability() {
        let estimator = trained();
        let catalog = GeographyCatalog::builtin();
        let city = catalog.get("Ankara").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let pred = estimator
            .predict(&FeatureVector::for_city(city, date))
            .unwrap();
        assert!((0.0..=1.0).contains(&pred.confidence));
    }

    #[test]
    fn highland_winter_looks_like_snow() {
        let estimator = trained();
        let catalog = GeographyCatalog::builtin();
        let city = catalog.get("Kars").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let pred = estimator
            .predict(&FeatureVector::for_city(city, date))
            .unwrap();
        // The training grid forces snow for this zone all winter, and the
        // regressor should land well below room temperature
        assert_eq!(pred.weather_label, "snow");
        assert!(pred.temperature_c < 10.0);
    }

    #[test]
    fn inference_is_deterministic() {
        let estimator = trained();
        let catalog = GeographyCatalog::builtin();
        let city = catalog.get("İzmir").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
        let features = FeatureVector::for_city(city, date);
        assert_eq!(
            estimator.predict(&features).unwrap(),
            estimator.predict(&features).unwrap()
        );
    }
}
