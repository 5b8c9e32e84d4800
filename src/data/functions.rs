//! Function table of the default expression evaluator

use phf::phf_map;

/// Functions understood by `MathEvaluator`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFunction {
    Sum,
    Product,
    Average,
    Median,
    Range,
    Min,
    Max,
    Counta,
    Mod,
    Power,
    Round,
    Abs,
    Sqrt,
    Exp,
    Ln,
    Log,
    Floor,
    Ceil,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Pi,
}

/// Accepted argument counts, `max = None` for variadic functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    const fn exactly(n: usize) -> Self {
        Arity {
            min: n,
            max: Some(n),
        }
    }

    const fn between(min: usize, max: usize) -> Self {
        Arity {
            min,
            max: Some(max),
        }
    }

    const fn at_least(min: usize) -> Self {
        Arity { min, max: None }
    }

    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl MathFunction {
    pub fn arity(self) -> Arity {
        use MathFunction::*;
        match self {
            Sum | Product | Average | Median | Range | Min | Max | Counta => Arity::at_least(1),
            Mod | Power | Atan2 => Arity::exactly(2),
            Round | Log => Arity::between(1, 2),
            Pi => Arity::exactly(0),
            Abs | Sqrt | Exp | Ln | Floor | Ceil | Sin | Cos | Tan | Asin | Acos | Atan => {
                Arity::exactly(1)
            }
        }
    }
}

/// Function names (lower case) to functions
pub static MATH_FUNCTIONS: phf::Map<&'static str, MathFunction> = phf_map! {
    // Aggregates
    "sum" => MathFunction::Sum,
    "product" => MathFunction::Product,
    "average" => MathFunction::Average,
    "mean" => MathFunction::Average,
    "median" => MathFunction::Median,
    "range" => MathFunction::Range,
    "min" => MathFunction::Min,
    "max" => MathFunction::Max,
    "counta" => MathFunction::Counta,

    // Arithmetic
    "mod" => MathFunction::Mod,
    "power" => MathFunction::Power,
    "pow" => MathFunction::Power,
    "round" => MathFunction::Round,
    "abs" => MathFunction::Abs,
    "sqrt" => MathFunction::Sqrt,
    "exp" => MathFunction::Exp,
    "ln" => MathFunction::Ln,
    "log" => MathFunction::Log,
    "floor" => MathFunction::Floor,
    "ceil" => MathFunction::Ceil,

    // Trigonometry
    "sin" => MathFunction::Sin,
    "cos" => MathFunction::Cos,
    "tan" => MathFunction::Tan,
    "asin" => MathFunction::Asin,
    "arcsin" => MathFunction::Asin,
    "acos" => MathFunction::Acos,
    "arccos" => MathFunction::Acos,
    "atan" => MathFunction::Atan,
    "arctan" => MathFunction::Atan,
    "atan2" => MathFunction::Atan2,
    "arctan2" => MathFunction::Atan2,
    "pi" => MathFunction::Pi,
};

/// Named constants (lower case)
pub static MATH_CONSTANTS: phf::Map<&'static str, f64> = phf_map! {
    "pi" => std::f64::consts::PI,
    "e" => std::f64::consts::E,
};

/// Look up a function by case-insensitive name
pub fn lookup_function(name: &str) -> Option<MathFunction> {
    MATH_FUNCTIONS.get(name.to_lowercase().as_str()).copied()
}

/// Look up a constant by case-insensitive name
pub fn lookup_constant(name: &str) -> Option<f64> {
    MATH_CONSTANTS.get(name.to_lowercase().as_str()).copied()
}
