use utoipa::OpenApi;

/// API Documentation
///
/// Paths and schemas are collected from the handlers as they are mounted.
#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Health", description = "Liveness endpoints"),
        (name = "Courses", description = "Public course catalog"),
        (name = "Cart", description = "Anonymous and signed-in carts"),
        (name = "Orders", description = "Orders and coupons"),
        (name = "Payments", description = "Card checkout and payment confirmation"),
        (name = "Student", description = "Student dashboard"),
        (name = "Teacher", description = "Teacher dashboard"),
        (name = "Curriculum", description = "Course editing"),
    ),
    info(
        title = "Course Marketplace API",
        version = "1.0.0",
        description = "Catalog, cart, checkout and learning dashboards",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
