//! Points on a short Weierstrass curve `y² = x³ + a·x + b` over a prime field
//!
//! The group law handles every case explicitly: identity absorption, inverse
//! cancellation, the chord rule, the tangent rule, and the vertical tangent at
//! `y = 0`.

use std::fmt;

use num_bigint::BigUint;
use num_traits::Zero;

use super::field::FieldElement;
use crate::error::{Result, SigScriptError};

/// A curve point, or the point at infinity when `coords` is `None`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    coords: Option<(FieldElement, FieldElement)>,
    a: FieldElement,
    b: FieldElement,
}

impl Point {
    /// Construct a finite point, checking the curve equation
    pub fn new(x: FieldElement, y: FieldElement, a: FieldElement, b: FieldElement) -> Result<Self> {
        let lhs = y.square();
        let rhs = x.square().mul(&x)?.add(&a.mul(&x)?)?.add(&b)?;
        if lhs != rhs {
            return Err(SigScriptError::NotOnCurve(x.num().to_string(), y.num().to_string()));
        }
        Ok(Self {
            coords: Some((x, y)),
            a,
            b,
        })
    }

    /// Construct without the curve check; only for compile-time known points
    pub(crate) fn new_unchecked(
        x: FieldElement,
        y: FieldElement,
        a: FieldElement,
        b: FieldElement,
    ) -> Self {
        Self {
            coords: Some((x, y)),
            a,
            b,
        }
    }

    /// The identity element of the curve `(a, b)`
    pub fn infinity(a: FieldElement, b: FieldElement) -> Self {
        Self { coords: None, a, b }
    }

    #[inline]
    pub fn is_infinity(&self) -> bool {
        self.coords.is_none()
    }

    #[inline]
    pub fn x(&self) -> Option<&FieldElement> {
        self.coords.as_ref().map(|(x, _)| x)
    }

    #[inline]
    pub fn y(&self) -> Option<&FieldElement> {
        self.coords.as_ref().map(|(_, y)| y)
    }

    #[inline]
    pub fn a(&self) -> &FieldElement {
        &self.a
    }

    #[inline]
    pub fn b(&self) -> &FieldElement {
        &self.b
    }

    fn same_curve(&self, other: &Self) -> bool {
        self.a == other.a && self.b == other.b
    }

    fn identity(&self) -> Self {
        Self::infinity(self.a.clone(), self.b.clone())
    }

    /// Group addition
    pub fn add(&self, other: &Self) -> Result<Self> {
        if !self.same_curve(other) {
            return Err(SigScriptError::CurveMismatch);
        }

        let (x1, y1) = match &self.coords {
            None => return Ok(other.clone()),
            Some(c) => c,
        };
        let (x2, y2) = match &other.coords {
            None => return Ok(self.clone()),
            Some(c) => c,
        };

        if x1 == x2 && y1 != y2 {
            return Ok(self.identity());
        }

        if x1 != x2 {
            // chord: s = (y2 - y1) / (x2 - x1)
            let s = y2.sub(y1)?.div(&x2.sub(x1)?)?;
            let x3 = s.square().sub(x1)?.sub(x2)?;
            let y3 = s.mul(&x1.sub(&x3)?)?.sub(y1)?;
            return Self::new(x3, y3, self.a.clone(), self.b.clone());
        }

        // Same point from here on. A vertical tangent sends it to infinity.
        if y1.is_zero() {
            return Ok(self.identity());
        }

        // tangent: s = (3x² + a) / 2y
        let numerator = x1.square().scale(&BigUint::from(3u32)).add(&self.a)?;
        let s = numerator.div(&y1.scale(&BigUint::from(2u32)))?;
        let x3 = s.square().sub(&x1.scale(&BigUint::from(2u32)))?;
        let y3 = s.mul(&x1.sub(&x3)?)?.sub(y1)?;
        Self::new(x3, y3, self.a.clone(), self.b.clone())
    }

    /// Additive inverse `(x, -y)`
    pub fn neg(&self) -> Self {
        Self {
            coords: self.coords.as_ref().map(|(x, y)| (x.clone(), y.neg())),
            a: self.a.clone(),
            b: self.b.clone(),
        }
    }

    /// Double-and-add over the bits of `coefficient`, starting from infinity
    pub fn scalar_mul(&self, coefficient: &BigUint) -> Result<Self> {
        let mut coef = coefficient.clone();
        let mut current = self.clone();
        let mut result = self.identity();
        while !coef.is_zero() {
            if coef.bit(0) {
                result = result.add(&current)?;
            }
            current = current.add(&current)?;
            coef >>= 1;
        }
        Ok(result)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.coords {
            None => write!(f, "Point(infinity)"),
            Some((x, y)) => write!(
                f,
                "Point({}, {})_{}_{} FieldElement({})",
                x.num(),
                y.num(),
                self.a.num(),
                self.b.num(),
                x.prime()
            ),
        }
    }
}
