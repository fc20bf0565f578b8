use axum::{extract::State, response::Html};

use crate::application::http::server::app_state::AppState;

const SUBMIT_URL_PLACEHOLDER: &str = "__SUBMIT_URL__";

const DEMO_PAGE: &str = r##"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>MealTally</title>
    <style>
        body { font-family: sans-serif; max-width: 960px; margin: 30px auto; padding: 0 15px; color: #333; }
        form { display: flex; gap: 10px; align-items: center; margin-bottom: 20px; }
        #error { color: #E65100; margin-bottom: 10px; }
    </style>
</head>
<body>
    <h2>🍱 MealTally</h2>
    <form id="meal-form">
        <input type="file" name="image" accept="image/*" required>
        <button type="submit">분석하기</button>
        <button type="button" id="reset">초기화</button>
    </form>
    <div id="error"></div>
    <div id="result"></div>
    <script>
        const submitUrl = "__SUBMIT_URL__";
        const form = document.getElementById("meal-form");
        const result = document.getElementById("result");
        const error = document.getElementById("error");
        let priorMarkup = "";

        form.addEventListener("submit", async (event) => {
            event.preventDefault();
            error.textContent = "";
            const data = new FormData(form);
            data.append("prior_markup", priorMarkup);

            const response = await fetch(submitUrl, { method: "POST", body: data });
            const body = await response.json();
            if (!response.ok) {
                error.textContent = body.message;
                return;
            }
            if (body.status === "state_corrupted") {
                error.textContent = "이전 기록을 읽을 수 없습니다. 초기화 후 다시 시도하세요.";
            }
            priorMarkup = body.next_state_markup;
            result.innerHTML = body.display_markup;
        });

        document.getElementById("reset").addEventListener("click", () => {
            priorMarkup = "";
            result.innerHTML = "";
            error.textContent = "";
        });
    </script>
</body>
</html>
"##;

/// Upload form that threads the returned markup into the next submission.
pub async fn demo_page(State(state): State<AppState>) -> Html<String> {
    let submit_url = format!("{}/nutrition/submit", state.args.server.root_path);

    Html(DEMO_PAGE.replace(SUBMIT_URL_PLACEHOLDER, &submit_url))
}
