//! Blending two volumes

use super::StepContext;
use crate::core_types::addition::IngredientAddition;
use crate::error::BrewResult;
use crate::physics::mix_volumes;
use serde::{Deserialize, Serialize};

/// Mixes `first` and `second` into `output`, which takes the first input's type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combine {
    pub first: String,
    pub second: String,
    pub output: String,
}

impl Combine {
    pub fn new(first: &str, second: &str, output: &str) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
            output: output.to_string(),
        }
    }

    pub(crate) fn apply(
        &self,
        additions: &[IngredientAddition],
        ctx: &mut StepContext<'_>,
    ) -> BrewResult<()> {
        let first = ctx.input(&self.first)?;
        let second = ctx.input(&self.second)?;
        if first.volume_type() != second.volume_type() {
            ctx.warn(format!(
                "combining {} with {}, the result is treated as {}",
                first.volume_type(),
                second.volume_type(),
                first.volume_type()
            ));
        }
        let mut combined = mix_volumes(&self.output, first.volume_type(), &first, &second)?;
        combined.add_additions(additions);
        ctx.output(combined);
        Ok(())
    }
}
