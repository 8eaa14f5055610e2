use crate::domain::DerivedListing;
use maud::{html, Markup};

/// Tooltip contents for a hovered heat marker.
pub fn tooltip_body(listing: &DerivedListing) -> Markup {
    let trend = if listing.percent_change > 0.0 { "📈" } else { "📉" };

    html! {
        strong { "Price Change:" }
        " " (format!("{:.2}", listing.percent_change)) "% " (trend)
        br;
        strong { "Latest Price:" }
        " $" (listing.current_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ListingRecord, ListingStatus};

    #[test]
    fn shows_change_and_latest_price() {
        let record = ListingRecord {
            id: Some("t1".into()),
            lat: 0.0,
            lon: 0.0,
            beds: 1,
            baths: 1.0,
            size_sqft: None,
            listing_type: ListingStatus::Active,
            address: String::new(),
            description: None,
            year_built: None,
            home_type: None,
            garage: false,
            garden: false,
            prices: vec!["01/01/2020|200".into(), "01/01/2021|150".into()],
        };
        let listing = DerivedListing::derive(record).unwrap();
        let html = tooltip_body(&listing).into_string();

        assert!(html.contains("-25.00% 📉"));
        assert!(html.contains("$150"));
        assert!(html.contains("<br>"));
    }
}
