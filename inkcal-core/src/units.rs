use std::fmt;
use std::str::FromStr;

/// Temperature units accepted by the weather display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Celsius => "celsius",
            Units::Fahrenheit => "fahrenheit",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = String;

    /// Only the exact lowercase literals are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "celsius" => Ok(Units::Celsius),
            "fahrenheit" => Ok(Units::Fahrenheit),
            other => Err(format!(
                "Unknown units '{other}', expected \"fahrenheit\" or \"celsius\""
            )),
        }
    }
}
