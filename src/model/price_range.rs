/// One bar of the price histogram.
///
/// The label reads as an inclusive range (`101-200`). The first bucket starts at zero inclusive;
/// every later bucket starts just above the previous bucket's `max`, so fractional prices such as
/// `100.5` still land in exactly one bucket.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct PriceBucket {
    label: &'static str,
    min: u32,
    max: Option<u32>,
}

/// The fixed histogram, in display order.
pub const PRICE_BUCKETS: [PriceBucket; 10] = [
    PriceBucket::new("0-100", 0, Some(100)),
    PriceBucket::new("101-200", 101, Some(200)),
    PriceBucket::new("201-300", 201, Some(300)),
    PriceBucket::new("301-400", 301, Some(400)),
    PriceBucket::new("401-500", 401, Some(500)),
    PriceBucket::new("501-600", 501, Some(600)),
    PriceBucket::new("601-700", 601, Some(700)),
    PriceBucket::new("701-800", 701, Some(800)),
    PriceBucket::new("801-900", 801, Some(900)),
    PriceBucket::new("901-above", 901, None),
];

impl PriceBucket {
    const fn new(label: &'static str, min: u32, max: Option<u32>) -> Self {
        Self { label, min, max }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// `None` for the open-ended last bucket.
    pub fn max(&self) -> Option<u32> {
        self.max
    }

    /// The lower bound and whether it is inclusive.
    pub(crate) fn lower_bound(&self) -> (f64, bool) {
        match self.min {
            0 => (0.0, true),
            n => (f64::from(n - 1), false),
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        let (lower, inclusive) = self.lower_bound();
        let above = if inclusive {
            price >= lower
        } else {
            price > lower
        };
        let below = match self.max {
            Some(max) => price <= f64::from(max),
            None => true,
        };
        above && below
    }
}
