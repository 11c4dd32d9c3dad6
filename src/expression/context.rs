use crate::expression::eval::{Environment, MAX_LIST_LEN, Value};
use crate::foundation::error::{UndulateError, UndulateResult};

/// Voltage window and random seed shared by every analogue brick of a draw.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalogueContext {
    /// Voltage drawn at the bottom rail.
    #[serde(rename = "VSSA", alias = "vssa")]
    pub vssa: f64,
    /// Voltage drawn at the top rail.
    #[serde(rename = "VDDA", alias = "vdda")]
    pub vdda: f64,
    /// Seed of the `rnd()` sequence.
    pub seed: u64,
}

impl Default for AnalogueContext {
    fn default() -> Self {
        Self {
            vssa: 0.0,
            vdda: 1.8,
            seed: 0,
        }
    }
}

impl AnalogueContext {
    /// Map a voltage to a y coordinate inside a brick of the given height.
    pub fn transform_y(&self, v: f64, height: f64) -> f64 {
        let scaled = (v - self.vssa) / (self.vdda - self.vssa);
        height - height * scaled
    }

    /// Inverse of [`AnalogueContext::transform_y`].
    pub fn inverse_transform_y(&self, y: f64, height: f64) -> f64 {
        (height - y) / height * (self.vdda - self.vssa) + self.vssa
    }

    /// Evaluation environment of an equation for a brick of `width` x `height`.
    ///
    /// `time` is the list `0..=int(width)`; wider bricks are rejected.
    pub fn environment(&self, width: f64, height: f64) -> UndulateResult<Environment> {
        let steps = width.max(0.0).trunc();
        if steps >= MAX_LIST_LEN as f64 {
            return Err(UndulateError::expression(format!(
                "brick width {width} exceeds the {MAX_LIST_LEN} entries of a list"
            )));
        }
        let steps = steps as usize;
        let mut env = Environment::new(self.seed);
        env.set(
            "time",
            Value::List((0..=steps).map(|t| Value::Number(t as f64)).collect()),
        );
        env.set_number("Tmax", width);
        env.set_number("Ymax", height);
        env.set_number("VSSA", self.vssa);
        env.set_number("VDDA", self.vdda);
        Ok(env)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/expression/context.rs"]
mod tests;
