use fake::{
    Dummy, Fake, Faker, Rng,
    faker::{
        address::en::{CityName, CountryName, PostCode, StreetName},
        internet::en::SafeEmail,
        lorem::en::Word,
        name::en::Name,
    },
};
use rust_decimal::Decimal;

use crate::domain::{
    ProductId,
    catalog::Product,
    orders::{OrderItem, ShippingDetails},
};

/// Prices between 0.10 and 9.99.
pub struct Price;

impl Dummy<Price> for Decimal {
    fn dummy_with_rng<R: Rng + ?Sized>(_config: &Price, rng: &mut R) -> Self {
        let value: i64 = (10..1000).fake_with_rng(rng);
        Decimal::new(value, 2)
    }
}

/// UK shoe sizes, e.g. `UK9`.
pub struct ShoeSize;

impl Dummy<ShoeSize> for String {
    fn dummy_with_rng<R: Rng + ?Sized>(_config: &ShoeSize, rng: &mut R) -> Self {
        let size: u8 = (3..14).fake_with_rng(rng);
        format!("UK{size}")
    }
}

impl Dummy<Faker> for ShippingDetails {
    fn dummy_with_rng<R: Rng + ?Sized>(_config: &Faker, rng: &mut R) -> Self {
        ShippingDetails {
            full_name: Name().fake_with_rng(rng),
            email: SafeEmail().fake_with_rng(rng),
            address: StreetName().fake_with_rng(rng),
            city: CityName().fake_with_rng(rng),
            postcode: PostCode().fake_with_rng(rng),
            country: CountryName().fake_with_rng(rng),
        }
    }
}

impl Dummy<Faker> for OrderItem {
    fn dummy_with_rng<R: Rng + ?Sized>(_config: &Faker, rng: &mut R) -> Self {
        let product_id: ProductId = Faker.fake_with_rng(rng);
        let name: String = Word().fake_with_rng(rng);
        OrderItem {
            product_id,
            name: format!("Air {name}"),
            price: Price.fake_with_rng(rng),
            quantity: (1..4).fake_with_rng(rng),
            size: ShoeSize.fake_with_rng(rng),
            image: format!("https://images.example.com/{product_id}.jpg"),
        }
    }
}

impl Dummy<Faker> for Product {
    fn dummy_with_rng<R: Rng + ?Sized>(_config: &Faker, rng: &mut R) -> Self {
        let product_id: ProductId = Faker.fake_with_rng(rng);
        let name: String = Word().fake_with_rng(rng);
        let now = jiff::Timestamp::now();
        Product {
            product_id,
            name: format!("Air {name}"),
            brand: "Nike".to_owned(),
            description: format!("The Air {name} in a limited run."),
            price: Price.fake_with_rng(rng),
            images: vec![format!("https://images.example.com/{product_id}.jpg")],
            sizes: vec![ShoeSize.fake_with_rng(rng), ShoeSize.fake_with_rng(rng)],
            colors: vec!["Black".to_owned()],
            style: "Low".to_owned(),
            category: "Lifestyle".to_owned(),
            created_at: now,
            updated_at: now,
        }
    }
}
