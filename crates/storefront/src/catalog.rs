//! Static coffee catalog.
//!
//! The catalog is immutable, built once at startup and shared through
//! [`crate::state::AppState`]. Browse filtering is a case-insensitive
//! substring match on the coffee name.

use coffee_delivery_core::{CoffeeId, Price};

/// A catalog entry.
#[derive(Debug, Clone)]
pub struct Coffee {
    pub id: CoffeeId,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub price: Price,
    /// Path under `/static` to the product illustration.
    pub image: String,
}

/// The immutable list of available coffees.
#[derive(Debug, Clone)]
pub struct Catalog {
    coffees: Vec<Coffee>,
}

impl Catalog {
    /// Build a catalog from a fixed list of coffees.
    #[must_use]
    pub const fn new(coffees: Vec<Coffee>) -> Self {
        Self { coffees }
    }

    /// All coffees, in catalog order.
    #[must_use]
    pub fn coffees(&self) -> &[Coffee] {
        &self.coffees
    }

    /// Look up a coffee by id.
    #[must_use]
    pub fn get(&self, id: &CoffeeId) -> Option<&Coffee> {
        self.coffees.iter().find(|coffee| &coffee.id == id)
    }

    /// Coffees whose name contains `query`, ignoring case.
    ///
    /// An empty or whitespace-only query matches everything.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&Coffee> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.coffees.iter().collect();
        }
        self.coffees
            .iter()
            .filter(|coffee| coffee.name.to_lowercase().contains(&needle))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(default_coffees())
    }
}

fn coffee(
    slug: &str,
    name: &str,
    description: &str,
    tags: &[&str],
    price_cents: i64,
) -> Coffee {
    Coffee {
        id: CoffeeId::from(slug),
        name: name.to_string(),
        description: description.to_string(),
        tags: tags.iter().map(ToString::to_string).collect(),
        price: Price::from_cents(price_cents),
        image: format!("/static/images/coffees/{slug}.png"),
    }
}

/// The fixed product list shipped with the storefront.
fn default_coffees() -> Vec<Coffee> {
    vec![
        coffee(
            "expresso-tradicional",
            "Expresso Tradicional",
            "O tradicional café feito com água quente e grãos moídos",
            &["tradicional"],
            990,
        ),
        coffee(
            "expresso-americano",
            "Expresso Americano",
            "Expresso diluído, menos intenso que o tradicional",
            &["tradicional"],
            990,
        ),
        coffee(
            "expresso-cremoso",
            "Expresso Cremoso",
            "Café expresso tradicional com espuma cremosa",
            &["tradicional"],
            990,
        ),
        coffee(
            "expresso-gelado",
            "Expresso Gelado",
            "Bebida preparada com café expresso e cubos de gelo",
            &["tradicional", "gelado"],
            990,
        ),
        coffee(
            "cafe-com-leite",
            "Café com Leite",
            "Meio a meio de expresso tradicional com leite vaporizado",
            &["tradicional", "com leite"],
            990,
        ),
        coffee(
            "latte",
            "Latte",
            "Uma dose de café expresso com o dobro de leite e espuma cremosa",
            &["tradicional", "com leite"],
            990,
        ),
        coffee(
            "capuccino",
            "Capuccino",
            "Bebida com canela feita de doses iguais de café, leite e espuma",
            &["tradicional", "com leite"],
            890,
        ),
        coffee(
            "macchiato",
            "Macchiato",
            "Café expresso misturado com um pouco de leite quente e espuma",
            &["tradicional", "com leite"],
            990,
        ),
        coffee(
            "mocaccino",
            "Mocaccino",
            "Café expresso com calda de chocolate, pouco leite e espuma",
            &["tradicional", "com leite"],
            990,
        ),
        coffee(
            "chocolate-quente",
            "Chocolate Quente",
            "Bebida feita com chocolate dissolvido no leite quente e café",
            &["especial", "com leite"],
            990,
        ),
        coffee(
            "cubano",
            "Cubano",
            "Drink gelado de café expresso com rum, creme de leite e hortelã",
            &["especial", "alcoólico", "gelado"],
            990,
        ),
        coffee(
            "havaiano",
            "Havaiano",
            "Bebida adocicada preparada com café e leite de coco",
            &["especial"],
            990,
        ),
        coffee(
            "arabe",
            "Árabe",
            "Bebida preparada com grãos de café árabe e especiarias",
            &["especial"],
            990,
        ),
        coffee(
            "irlandes",
            "Irlandês",
            "Bebida a base de café, uísque irlandês, açúcar e chantilly",
            &["especial", "alcoólico"],
            990,
        ),
    ]
}
