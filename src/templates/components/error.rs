use crate::errors::AppError;
use maud::{html, Markup};

/// Banner shown over the map when listings could not be loaded.
pub fn error_banner(err: &AppError, has_data: bool) -> Markup {
    let headline = if has_data {
        "Showing the last listings we could load."
    } else {
        "We couldn't load any listings."
    };

    html! {
        div class="error-banner" role="alert" {
            strong { (headline) }
            " "
            span class="error-detail" { (err.user_message()) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;

    #[test]
    fn banner_escapes_detail_and_picks_headline() {
        let err = AppError::Api(ApiError::Status {
            status: 502,
            body: "<html>bad gateway</html>".into(),
        });

        let empty = error_banner(&err, false).into_string();
        assert!(empty.contains("We couldn't load any listings."));
        assert!(empty.contains(r#"role="alert""#));
        assert!(!empty.contains("<html>"));

        let stale = error_banner(&err, true).into_string();
        assert!(stale.contains("Showing the last listings"));
    }
}
