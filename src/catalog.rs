/// A measured water quality parameter and the bounds its input accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub key: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub default: f64,
    pub unit: &'static str,
    pub description: &'static str,
}

/// The parameters in the exact order the model was trained on.
pub const CATALOG: [ParameterSpec; 9] = [
    ParameterSpec {
        key: "ph",
        min: 1.0,
        max: 14.0,
        step: 0.1,
        default: 7.0,
        unit: "",
        description: "Measures how acidic/basic the water is. Ideal range is 6.5-8.5.",
    },
    ParameterSpec {
        key: "Hardness",
        min: 30.0,
        max: 300.0,
        step: 1.0,
        default: 150.0,
        unit: "mg/L",
        description: "Amount of dissolved calcium and magnesium in mg/L. \
            Ideal range is 60-180 mg/L (moderately hard to hard).",
    },
    ParameterSpec {
        key: "Solids",
        min: 100.0,
        max: 60000.0,
        step: 100.0,
        default: 20000.0,
        unit: "ppm",
        description: "Total dissolved solids (TDS) in ppm. \
            Ideal range is 50-150 ppm (for good taste and mineral balance).",
    },
    ParameterSpec {
        key: "Chloramines",
        min: 0.1,
        max: 13.0,
        step: 0.1,
        default: 7.0,
        unit: "mg/L",
        description: "Disinfectants used in water treatment in mg/L. Ideal range is 0.5-4 mg/L.",
    },
    ParameterSpec {
        key: "Sulfate",
        min: 100.0,
        max: 500.0,
        step: 1.0,
        default: 300.0,
        unit: "mg/L",
        description: "Naturally occurring mineral in mg/L. Ideal range is less than 250 mg/L \
            (with a maximum of 500 mg/L for aesthetic reasons).",
    },
    ParameterSpec {
        key: "Conductivity",
        min: 100.0,
        max: 800.0,
        step: 1.0,
        default: 400.0,
        unit: "μS/cm",
        description: "Ability of water to conduct electricity in μS/cm. \
            Ideal range is 50-500 μS/cm.",
    },
    ParameterSpec {
        key: "Organic_carbon",
        min: 2.0,
        max: 30.0,
        step: 0.1,
        default: 15.0,
        unit: "mg/L",
        description: "Amount of carbon bound in organic compounds in mg/L. \
            Ideal range is less than 2 mg/L for treated water and less than 4 mg/L for source water.",
    },
    ParameterSpec {
        key: "Trihalomethanes",
        min: 0.5,
        max: 150.0,
        step: 0.5,
        default: 60.0,
        unit: "μg/L",
        description: "Byproducts of water disinfection in μg/L. \
            Ideal range is less than 80 μg/L (US EPA MCL) or less than 100 μg/L (EU directive).",
    },
    ParameterSpec {
        key: "Turbidity",
        min: 1.0,
        max: 7.0,
        step: 0.1,
        default: 4.0,
        unit: "NTU",
        description: "Cloudiness of water caused by suspended particles in NTU. \
            Ideal range is 1.0-5.0 NTU.",
    },
];

/// Number of parameters, which is also the number of editing steps.
pub const NUM_PARAMS: usize = CATALOG.len();

/// Looks up a parameter by key.
pub fn find(key: &str) -> Option<(usize, &'static ParameterSpec)> {
    CATALOG.iter().enumerate().find(|(_, spec)| spec.key == key)
}

/// The catalog keys in feature order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|spec| spec.key)
}

impl ParameterSpec {
    /// Human readable name: `Organic_carbon` becomes `Organic Carbon`.
    pub fn label(&self) -> String {
        self.key
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    /// Number of quantization steps between `min` and `max`.
    pub fn ticks(&self) -> i64 {
        ((self.max - self.min) / self.step).round() as i64
    }

    /// Decimal places needed to print a multiple of `step` exactly.
    pub fn decimals(&self) -> usize {
        let mut scaled = self.step;
        let mut decimals = 0;
        while (scaled - scaled.round()).abs() > 1e-9 && decimals < 6 {
            scaled *= 10.0;
            decimals += 1;
        }
        decimals
    }

    /// Clamps `value` into `[min, max]` and snaps it onto the `min + k * step` grid.
    ///
    /// The result is always inside the bounds, including when `max - min` is not
    /// a whole number of steps.
    pub fn normalize(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let k = ((clamped - self.min) / self.step).round();
        let snapped = self.round(self.min + k * self.step);
        snapped.clamp(self.min, self.max)
    }

    /// Formats `value` with the precision of this parameter's step.
    pub fn format(&self, value: f64) -> String {
        format!("{value:.*}", self.decimals())
    }

    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.decimals() as i32);
        (value * factor).round() / factor
    }
}
