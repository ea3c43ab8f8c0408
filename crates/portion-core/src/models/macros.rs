use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Energy and macronutrient amounts.
///
/// Used both for per-100g reference values and for absolute amounts
/// (served portions, totals, targets).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub kcal: f64,
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
}

impl Macros {
    pub const ZERO: Macros = Macros {
        kcal: 0.0,
        protein: 0.0,
        fat: 0.0,
        carbs: 0.0,
    };

    pub fn new(kcal: f64, protein: f64, fat: f64, carbs: f64) -> Self {
        Self {
            kcal,
            protein,
            fat,
            carbs,
        }
    }

    /// Scale per-100g reference values to `grams` of product.
    pub fn for_grams(&self, grams: f64) -> Macros {
        let ratio = grams / 100.0;
        Macros {
            kcal: self.kcal * ratio,
            protein: self.protein * ratio,
            fat: self.fat * ratio,
            carbs: self.carbs * ratio,
        }
    }

    /// Component-wise division. A zero divisor yields zero.
    pub fn divided_by(&self, divisor: f64) -> Macros {
        if divisor == 0.0 {
            return Macros::ZERO;
        }
        Macros {
            kcal: self.kcal / divisor,
            protein: self.protein / divisor,
            fat: self.fat / divisor,
            carbs: self.carbs / divisor,
        }
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            kcal: self.kcal + rhs.kcal,
            protein: self.protein + rhs.protein,
            fat: self.fat + rhs.fat,
            carbs: self.carbs + rhs.carbs,
        }
    }
}

impl AddAssign for Macros {
    fn add_assign(&mut self, rhs: Macros) {
        *self = *self + rhs;
    }
}

impl Sum for Macros {
    fn sum<I: Iterator<Item = Macros>>(iter: I) -> Macros {
        iter.fold(Macros::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Macros> for Macros {
    fn sum<I: Iterator<Item = &'a Macros>>(iter: I) -> Macros {
        iter.copied().sum()
    }
}
