use rand::distributions::Alphanumeric;
use rand::Rng;
use std::fmt;

/// Length of randomly generated product names.
const NAME_LEN: usize = 8;

/// A synthetic product attached to a graph vertex.
///
/// The payload is opaque to the graph algorithms: contraction never inspects
/// it, and two products compare equal only if all three attributes match,
/// which is what the identity lookup on [`MultiGraph`](crate::MultiGraph)
/// relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    name: String,
    category: u32,
    price: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, category: u32, price: f64) -> Self {
        Self {
            name: name.into(),
            category,
            price,
        }
    }

    /// Generates a product with a random alphanumeric name, a category in
    /// `1..=10`, and a price rounded to a whole amount in `0..=100`.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let name: String = (0..NAME_LEN)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect();
        Self {
            name,
            category: rng.gen_range(1..=10),
            price: (rng.gen::<f64>() * 100.0).round(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> u32 {
        self.category
    }

    pub fn price(&self) -> f64 {
        self.price
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (category {}, price {:.2})",
            self.name, self.category, self.price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_product_attributes_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let p = Product::random(&mut rng);
            assert_eq!(p.name().len(), NAME_LEN);
            assert!(p.name().chars().all(|c| c.is_ascii_alphanumeric()));
            assert!((1..=10).contains(&p.category()));
            assert!((0.0..=100.0).contains(&p.price()));
            assert_eq!(p.price(), p.price().round());
        }
    }

    #[test]
    fn test_random_products_are_replayable() {
        let a = Product::random(&mut StdRng::seed_from_u64(42));
        let b = Product::random(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_display_includes_attributes() {
        let p = Product::new("widget", 3, 25.0);
        let rendered = p.to_string();
        assert!(rendered.contains("widget"));
        assert!(rendered.contains("category 3"));
    }
}
