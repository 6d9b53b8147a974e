//! Natural-language query building for flight searches.

/// Build a flight search query from structured parameters.
///
/// The date clauses are appended only when the value is present and
/// non-empty.
pub fn flight_query(
    origin: &str,
    destination: &str,
    depart_date: Option<&str>,
    return_date: Option<&str>,
) -> String {
    let mut query = format!("flights from {} to {}", origin, destination);

    if let Some(date) = depart_date.filter(|d| !d.is_empty()) {
        query.push_str(" on ");
        query.push_str(date);
    }

    if let Some(date) = return_date.filter(|d| !d.is_empty()) {
        query.push_str(" return ");
        query.push_str(date);
    }

    query
}
