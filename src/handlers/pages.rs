use axum::response::Html;

const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html lang="ru">
<head><meta charset="utf-8"><title>Интернет Банк</title></head>
<body>
  <h2 class="heading">Интернет Банк Мечты</h2>
  <form class="form" action="/api/auth" method="post">
    <span data-test-id="login"><span class="input__box"><input class="input__control" name="login" type="text"></span></span>
    <span data-test-id="password"><span class="input__box"><input class="input__control" name="password" type="password"></span></span>
    <button type="submit">Продолжить</button>
  </form>
  <div data-test-id="error-notification" class="notification" hidden>
    <div class="notification__title">Ошибка</div>
    <div class="notification__content"></div>
  </div>
</body>
</html>
"#;

const DASHBOARD_PAGE: &str = r#"<!DOCTYPE html>
<html lang="ru">
<head><meta charset="utf-8"><title>Интернет Банк</title></head>
<body>
  <h2 id="root">Личный кабинет</h2>
</body>
</html>
"#;

/// GET /
pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

/// GET /dashboard
pub async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}
