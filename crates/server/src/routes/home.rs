//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

/// One documented API endpoint on the landing page.
pub struct Endpoint {
    pub methods: &'static str,
    pub path: &'static str,
    pub params: &'static str,
    pub description: &'static str,
}

/// Endpoints listed on the landing page, in display order.
pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        methods: "GET",
        path: "/random",
        params: "",
        description: "A random cafe.",
    },
    Endpoint {
        methods: "GET",
        path: "/all",
        params: "",
        description: "Every cafe in the database.",
    },
    Endpoint {
        methods: "GET",
        path: "/search",
        params: "loc",
        description: "Cafes at an exact location (case-sensitive).",
    },
    Endpoint {
        methods: "GET, POST",
        path: "/add",
        params: "name, map_url, img_url, loc, seats, toilet, wifi, sockets, calls, coffee_price",
        description: "Add a cafe. Boolean fields are true when present and non-empty.",
    },
    Endpoint {
        methods: "GET, POST, PATCH",
        path: "/update-price/{cafe_id}",
        params: "new_price",
        description: "Change the coffee price of a cafe.",
    },
    Endpoint {
        methods: "GET, POST, DELETE, PATCH",
        path: "/delete/{cafe_id}",
        params: "api-key",
        description: "Delete a cafe. Requires the API key.",
    },
];

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub endpoints: &'static [Endpoint],
}

/// Display the landing page.
#[instrument]
pub async fn home() -> HomeTemplate {
    HomeTemplate {
        endpoints: ENDPOINTS,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_home_renders_every_endpoint() {
        let html = HomeTemplate {
            endpoints: ENDPOINTS,
        }
        .render()
        .unwrap();

        for endpoint in ENDPOINTS {
            assert!(html.contains(endpoint.description), "missing {}", endpoint.path);
        }
    }
}
