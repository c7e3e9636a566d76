use std::error::Error;

pub trait BinaryMetrics {
    /// Computes the precision and recall of a series of binary predictions.
    ///
    /// # Arguments
    ///
    /// * `expected` - The true labels.
    /// * `actual` - The predicted labels.
    ///
    /// # Returns
    ///
    /// The `(precision, recall)` pair. A zero denominator (no positive
    /// predictions, or no positive labels) yields 0.0 for the affected
    /// metric, so empty inputs yield `(0.0, 0.0)`.
    ///
    /// # Errors
    ///
    /// This method will return an error if the two series differ in length.
    fn precision_recall(
        &self,
        expected: &[bool],
        actual: &[bool],
    ) -> Result<(f64, f64), Box<dyn Error>> {
        if expected.len() != actual.len() {
            return Err("Predictions and labels are of different sizes.".into());
        }

        let mut true_positives = 0;
        let mut false_positives = 0;
        let mut false_negatives = 0;
        for (&expected, &actual) in expected.iter().zip(actual.iter()) {
            match (expected, actual) {
                (true, true) => true_positives += 1,
                (false, true) => false_positives += 1,
                (true, false) => false_negatives += 1,
                (false, false) => {}
            }
        }

        let precision = if true_positives + false_positives > 0 {
            true_positives as f64 / (true_positives + false_positives) as f64
        } else {
            0.0
        };
        let recall = if true_positives + false_negatives > 0 {
            true_positives as f64 / (true_positives + false_negatives) as f64
        } else {
            0.0
        };

        Ok((precision, recall))
    }

    /// Computes the F1 score of a series of binary predictions: 0.0 when
    /// precision and recall are both zero, else their harmonic mean.
    ///
    /// # Errors
    ///
    /// This method will return an error if the two series differ in length.
    fn f1_score(&self, expected: &[bool], actual: &[bool]) -> Result<f64, Box<dyn Error>> {
        let (precision, recall) = self.precision_recall(expected, actual)?;
        if precision + recall == 0.0 {
            return Ok(0.0);
        }
        Ok(2.0 * precision * recall / (precision + recall))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct MockEvaluator;

    impl BinaryMetrics for MockEvaluator {}

    #[test]
    fn test_precision_recall() {
        let evaluator = MockEvaluator;

        let expected = vec![true, true, false];
        let actual = vec![true, false, false];

        let (precision, recall) = evaluator.precision_recall(&expected, &actual).unwrap();
        assert_eq!(precision, 1.0);
        assert_eq!(recall, 0.5);
    }

    #[test]
    fn test_precision_recall_of_empty_series() {
        let evaluator = MockEvaluator;
        let result = evaluator.precision_recall(&[], &[]).unwrap();
        assert_eq!(result, (0.0, 0.0));
    }

    #[test]
    fn test_precision_recall_unequal() {
        let evaluator = MockEvaluator;
        let result = evaluator.precision_recall(&[true, false], &[true]);
        assert!(result.is_err());
    }

    #[test]
    fn test_precision_recall_without_positive_predictions() {
        let evaluator = MockEvaluator;

        let expected = vec![true, true, true];
        let actual = vec![false, false, false];

        let (precision, recall) = evaluator.precision_recall(&expected, &actual).unwrap();
        assert_eq!(precision, 0.0);
        assert_eq!(recall, 0.0);
    }

    #[test]
    fn test_f1_score() {
        let evaluator = MockEvaluator;

        let expected = vec![true, true, false];
        let actual = vec![true, false, false];

        let f1 = evaluator.f1_score(&expected, &actual).unwrap();
        assert_relative_eq!(f1, 2.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_f1_score_of_all_zero_counts_is_zero() {
        let evaluator = MockEvaluator;
        assert_eq!(evaluator.f1_score(&[], &[]).unwrap(), 0.0);

        let expected = vec![true, true];
        let actual = vec![false, false];
        assert_eq!(evaluator.f1_score(&expected, &actual).unwrap(), 0.0);
    }

    #[test]
    fn test_f1_score_of_perfect_predictions_is_one() {
        let evaluator = MockEvaluator;

        let expected = vec![true, false, true];
        let actual = vec![true, false, true];
        assert_eq!(evaluator.f1_score(&expected, &actual).unwrap(), 1.0);
    }
}
