//! Implements the `Source` trait using in-memory data for testing purposes.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without downloading the dataset.

use crate::api::Source;
use crate::error::Res;
use crate::model::NewTransaction;
use anyhow::Context;
use std::io::Cursor;

/// An implementation of the `Source` trait that never touches the network. It can hold any data in
/// memory and, by default, is seeded with the data in this module.
#[derive(Debug, Clone)]
pub struct TestSource {
    data: Vec<NewTransaction>,
}

impl TestSource {
    pub fn new(data: Vec<NewTransaction>) -> Self {
        Self { data }
    }
}

#[async_trait::async_trait]
impl Source for TestSource {
    async fn fetch(&self) -> Res<Vec<NewTransaction>> {
        Ok(self.data.clone())
    }
}

impl Default for TestSource {
    /// Loads seed data from this module.
    fn default() -> Self {
        // The seed data is a constant checked by the tests below.
        Self::new(load_csv(SEED_DATA).unwrap_or_default())
    }
}

/// Loads transactions from a CSV-formatted string with a header row.
fn load_csv(csv_data: &str) -> Res<Vec<NewTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(Cursor::new(csv_data.as_bytes()));

    let mut rows = Vec::new();
    for (ix, result) in rdr.deserialize().enumerate() {
        let row: NewTransaction =
            result.with_context(|| format!("Unable to parse seed row {}", ix + 2))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Seed transaction data.
const SEED_DATA: &str = r##"title,description,price,dateOfSale,category,sold
Fjallraven Foldsack No. 1 Backpack,"Your perfect pack for everyday use and walks in the forest.",329.85,2021-11-27T20:29:54+05:30,men's clothing,false
Mens Casual Premium Slim Fit T-Shirts,Slim-fitting style with contrast raglan long sleeve.,44.6,2021-10-27T20:29:54+05:30,men's clothing,false
Mens Cotton Jacket,"Great outerwear jackets for Spring, Autumn and Winter.",615.89,2022-07-27T20:29:54+05:30,men's clothing,true
Mens Casual Slim Fit,The color could be slightly different between on the screen and in practice.,31.98,2021-09-27T20:29:54+05:30,men's clothing,true
John Hardy Women's Legends Naga Bracelet,"From our Legends Collection, the Naga was inspired by the mythical water dragon.",6950,2022-06-27T20:29:54+05:30,jewelery,false
Solid Gold Petite Micropave,Satisfaction guaranteed. Return or exchange any order within 30 days.,168,2021-12-27T20:29:54+05:30,jewelery,true
White Gold Plated Princess,Classic created wedding engagement solitaire diamond promise ring for her.,9.99,2022-05-27T20:29:54+05:30,jewelery,false
Pierced Owl Rose Gold Plated Stainless Steel Double,Rose gold plated double flared tunnel plug earrings.,10.99,2021-08-27T20:29:54+05:30,jewelery,true
WD 2TB Elements Portable External Hard Drive,USB 3.0 and USB 2.0 compatibility with fast data transfers.,64,2022-03-27T20:29:54+05:30,electronics,true
SanDisk SSD PLUS 1TB Internal SSD,Easy upgrade for faster boot up and shutdown.,109,2022-03-27T20:29:54+05:30,electronics,false
Silicon Power 256GB SSD 3D NAND,3D NAND flash is applied to deliver high transfer speeds.,109,2021-11-27T20:29:54+05:30,electronics,true
WD 4TB Gaming Drive for Playstation 4,Expand your PS4 gaming experience.,114,2022-01-27T20:29:54+05:30,electronics,false
Acer SB220Q 21.5 inch Full HD IPS Monitor,21.5 inches Full HD widescreen IPS display.,599,2021-10-27T20:29:54+05:30,electronics,true
Samsung 49-Inch CHG90 Curved Gaming Monitor,49 inch super ultrawide 32:9 curved gaming monitor.,999.99,2022-02-27T20:29:54+05:30,electronics,false
BIYLACLESEN Women's 3-in-1 Snowboard Jacket,Detachable liner fabric with warm fleece.,56.99,2022-04-27T20:29:54+05:30,women's clothing,true
Lock and Love Women's Removable Hooded Jacket,100% polyurethane shell with 100% polyester lining.,29.95,2021-09-27T20:29:54+05:30,women's clothing,false
Rain Jacket Women Windbreaker Striped Climbing Raincoats,Lightweight perfect for trip or casual wear.,39.99,2022-08-27T20:29:54+05:30,women's clothing,true
MBJ Women's Solid Short Sleeve Boat Neck V,95% rayon and 5% spandex.,9.85,2022-03-27T20:29:54+05:30,women's clothing,false
Opna Women's Short Sleeve Moisture,100% polyester and machine wash.,7.95,2021-12-27T20:29:54+05:30,women's clothing,true
DANVOUY Womens T Shirt Casual Cotton Short,95% cotton and 5% spandex.,12.99,2022-01-27T20:29:54+05:30,women's clothing,false
"##;
