/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const BOOKINGS_ROUTE_COMPONENT: &str = "bookings";
pub const BOOKINGS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", BOOKINGS_ROUTE_COMPONENT);

pub const INQUIRIES_ROUTE_COMPONENT: &str = "inquiries";
pub const INQUIRIES_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", INQUIRIES_ROUTE_COMPONENT);

pub const PLANNER_ROUTE_COMPONENT: &str = "planner";
pub const PLANNER_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", PLANNER_ROUTE_COMPONENT);
