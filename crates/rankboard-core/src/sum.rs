/// Neumaier-compensated running sum.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub(crate) fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    pub(crate) fn value(&self) -> f64 {
        // An overflowed sum leaves an infinite compensation of opposite sign.
        if !self.sum.is_finite() {
            return self.sum;
        }
        self.sum + self.compensation
    }
}

#[cfg(test)]
mod tests {
    use super::CompensatedSum;

    #[test]
    fn recovers_small_terms_next_to_large_ones() {
        let mut s = CompensatedSum::default();
        for x in [1.0, 1e100, 1.0, -1e100] {
            s.add(x);
        }
        assert_eq!(s.value(), 2.0);
    }

    #[test]
    fn overflow_stays_infinite() {
        let mut s = CompensatedSum::default();
        s.add(f64::MAX);
        s.add(f64::MAX);
        assert_eq!(s.value(), f64::INFINITY);

        let mut s = CompensatedSum::default();
        s.add(-f64::MAX);
        s.add(-f64::MAX);
        s.add(1.0);
        assert_eq!(s.value(), f64::NEG_INFINITY);
    }
}
