use crate::formulas::Sex;

/// Values below `upper` get `label`; `upper` itself too when `inclusive`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub upper: f64,
    pub inclusive: bool,
    pub label: &'static str,
}

impl Band {
    fn contains(&self, value: f64) -> bool {
        value < self.upper || (self.inclusive && value == self.upper)
    }
}

/// Ordered interpretation bands with a catch-all label above the last one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bands {
    pub bands: &'static [Band],
    pub otherwise: &'static str,
}

impl Bands {
    pub const fn new(bands: &'static [Band], otherwise: &'static str) -> Self {
        Self { bands, otherwise }
    }

    pub fn classify(&self, value: f64) -> &'static str {
        if value.is_nan() {
            return "undefined";
        }
        self.bands
            .iter()
            .find(|band| band.contains(value))
            .map_or(self.otherwise, |band| band.label)
    }
}

const fn band(upper: f64, label: &'static str) -> Band {
    Band { upper, inclusive: false, label }
}

const fn band_through(upper: f64, label: &'static str) -> Band {
    Band { upper, inclusive: true, label }
}

pub const BMI: Bands = Bands::new(
    &[band(18.5, "underweight"), band(25.0, "normal"), band(30.0, "overweight")],
    "obese",
);

pub const CREATININE_CLEARANCE: Bands = Bands::new(
    &[
        band(15.0, "kidney failure"),
        band(30.0, "severe impairment"),
        band(60.0, "moderate impairment"),
        band(90.0, "mild impairment"),
    ],
    "normal",
);

pub const HAS_BLED: Bands = Bands::new(&[band(2.0, "low"), band(3.0, "moderate")], "high");

const CHA2DS2_VASC_MALE: Bands = Bands::new(&[band(1.0, "low"), band(2.0, "low-moderate")], "moderate-high");
const CHA2DS2_VASC_FEMALE: Bands = Bands::new(&[band(2.0, "low"), band(3.0, "low-moderate")], "moderate-high");

const QTC_MALE: Bands = Bands::new(
    &[band(450.0, "normal"), band(470.0, "borderline"), band_through(500.0, "prolonged")],
    "markedly prolonged",
);
const QTC_FEMALE: Bands = Bands::new(
    &[band(460.0, "normal"), band(480.0, "borderline"), band_through(500.0, "prolonged")],
    "markedly prolonged",
);

/// The female sex point does not by itself raise stroke risk.
pub fn cha2ds2_vasc_bands(sex: Sex) -> Bands {
    match sex {
        Sex::Male => CHA2DS2_VASC_MALE,
        Sex::Female => CHA2DS2_VASC_FEMALE,
    }
}

pub fn qtc_bands(sex: Sex) -> Bands {
    match sex {
        Sex::Male => QTC_MALE,
        Sex::Female => QTC_FEMALE,
    }
}
