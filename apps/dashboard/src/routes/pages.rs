use axum::response::Html;

pub async fn home() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

pub async fn about() -> Html<&'static str> {
    Html(include_str!("../../assets/about.html"))
}

pub async fn dashboard() -> Html<&'static str> {
    Html(include_str!("../../assets/dashboard.html"))
}
