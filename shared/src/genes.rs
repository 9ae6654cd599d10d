use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of network inputs: bird height, vertical gap offset, horizontal pipe distance.
pub const INPUTS: usize = 3;

/// Number of hidden neurons.
pub const HIDDEN: usize = 4;

/// Weights and biases are kept inside this range after mutation.
pub const WEIGHT_LIMIT: f64 = 30.0;

/// Largest nudge applied to a single weight by one mutation.
const MUTATION_POWER: f64 = 0.5;

#[derive(Debug, Error, PartialEq)]
pub enum GenomeError {
    #[error("{layer} has {actual} weights, expected {expected}")]
    Shape {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{layer} contains a non-finite weight")]
    NonFinite { layer: &'static str },
}

/// A brain is the genome of a bird controller.
///
/// It is a small fixed-topology feed-forward network: three inputs, one
/// hidden tanh layer and a single tanh output. The trainer evolves the
/// weights; the topology never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Brain {
    /// Input-to-hidden weights, `INPUTS` per hidden neuron, row by row
    pub hidden_weights: Vec<f64>,

    /// One bias per hidden neuron
    pub hidden_bias: Vec<f64>,

    /// Hidden-to-output weights
    pub output_weights: Vec<f64>,

    /// Output bias
    pub output_bias: f64,
}

impl Brain {
    /// Create a new random brain with weights in [-1.0, 1.0)
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            hidden_weights: (0..HIDDEN * INPUTS)
                .map(|_| rng.gen_range(-1.0..1.0))
                .collect(),
            hidden_bias: (0..HIDDEN).map(|_| rng.gen_range(-1.0..1.0)).collect(),
            output_weights: (0..HIDDEN).map(|_| rng.gen_range(-1.0..1.0)).collect(),
            output_bias: rng.gen_range(-1.0..1.0),
        }
    }

    /// Run the network forward and return the single output in (-1.0, 1.0)
    pub fn activate(&self, inputs: [f64; INPUTS]) -> f64 {
        let hidden = self
            .hidden_weights
            .chunks(INPUTS)
            .zip(&self.hidden_bias)
            .map(|(weights, bias)| {
                let sum: f64 = weights.iter().zip(inputs.iter()).map(|(w, x)| w * x).sum();
                (sum + bias).tanh()
            });

        let sum: f64 = hidden
            .zip(&self.output_weights)
            .map(|(h, w)| h * w)
            .sum();

        (sum + self.output_bias).tanh()
    }

    /// Mutate this brain by nudging each weight with probability `mutation_rate`
    pub fn mutate<R: Rng>(&mut self, mutation_rate: f64, rng: &mut R) {
        let genes = self
            .hidden_weights
            .iter_mut()
            .chain(self.hidden_bias.iter_mut())
            .chain(self.output_weights.iter_mut())
            .chain(std::iter::once(&mut self.output_bias));

        for gene in genes {
            if rng.gen::<f64>() < mutation_rate {
                *gene = (*gene + rng.gen_range(-MUTATION_POWER..MUTATION_POWER))
                    .clamp(-WEIGHT_LIMIT, WEIGHT_LIMIT);
            }
        }
    }

    /// Cross two brains to create offspring, picking every gene from either parent
    pub fn crossover<R: Rng>(&self, other: &Brain, rng: &mut R) -> Brain {
        let mut pick = |a: &[f64], b: &[f64]| -> Vec<f64> {
            a.iter()
                .zip(b)
                .map(|(x, y)| if rng.gen() { *x } else { *y })
                .collect()
        };

        let hidden_weights = pick(
            self.hidden_weights.as_slice(),
            other.hidden_weights.as_slice(),
        );
        let hidden_bias = pick(self.hidden_bias.as_slice(), other.hidden_bias.as_slice());
        let output_weights = pick(
            self.output_weights.as_slice(),
            other.output_weights.as_slice(),
        );
        let output_bias = if rng.gen() {
            self.output_bias
        } else {
            other.output_bias
        };

        Brain {
            hidden_weights,
            hidden_bias,
            output_weights,
            output_bias,
        }
    }

    /// Check the layer sizes and that every weight is finite.
    /// Brains loaded from disk go through this before they drive a bird.
    pub fn validate(&self) -> Result<(), GenomeError> {
        let layers: [(&'static str, &[f64], usize); 3] = [
            ("hidden_weights", self.hidden_weights.as_slice(), HIDDEN * INPUTS),
            ("hidden_bias", self.hidden_bias.as_slice(), HIDDEN),
            ("output_weights", self.output_weights.as_slice(), HIDDEN),
        ];

        for (layer, weights, expected) in layers {
            if weights.len() != expected {
                return Err(GenomeError::Shape {
                    layer,
                    expected,
                    actual: weights.len(),
                });
            }
            if weights.iter().any(|w| !w.is_finite()) {
                return Err(GenomeError::NonFinite { layer });
            }
        }

        if !self.output_bias.is_finite() {
            return Err(GenomeError::NonFinite {
                layer: "output_bias",
            });
        }

        Ok(())
    }
}

impl Default for Brain {
    /// An all-zero brain; its output is always 0.0, so it never flaps
    fn default() -> Self {
        Self {
            hidden_weights: vec![0.0; HIDDEN * INPUTS],
            hidden_bias: vec![0.0; HIDDEN],
            output_weights: vec![0.0; HIDDEN],
            output_bias: 0.0,
        }
    }
}
