use axum::{response::Html, routing::get, Router};

pub fn ui_routes() -> Router {
    Router::new().route("/", get(generator_page))
}

pub async fn generator_page() -> Html<&'static str> {
    Html(GENERATOR_PAGE)
}

const GENERATOR_PAGE: &str = r###"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>📺 YouTube Blog Generator</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            line-height: 1.6;
            color: #e8e8e8;
            background: linear-gradient(135deg, #1a1a2e 0%, #16213e 50%, #0f1419 100%);
            min-height: 100vh;
        }

        .container {
            max-width: 820px;
            margin: 0 auto;
            padding: 48px 20px;
        }

        h1 {
            font-size: 2.2rem;
            margin-bottom: 8px;
        }

        .subtitle {
            color: #a0a0b8;
            margin-bottom: 32px;
        }

        .input-row {
            display: flex;
            gap: 12px;
        }

        input[type="text"] {
            flex: 1;
            padding: 12px 16px;
            border-radius: 8px;
            border: 1px solid #2e3a5c;
            background: rgba(26, 26, 46, 0.9);
            color: #e8e8e8;
            font-size: 1rem;
        }

        button {
            padding: 12px 22px;
            border: none;
            border-radius: 8px;
            background: #e94560;
            color: white;
            font-size: 1rem;
            cursor: pointer;
        }

        button:disabled {
            opacity: 0.6;
            cursor: wait;
        }

        .notice {
            margin-top: 24px;
            padding: 14px 18px;
            border-radius: 8px;
            display: none;
        }

        .notice.info { background: rgba(52, 152, 219, 0.15); border: 1px solid #3498db; }
        .notice.warning { background: rgba(241, 196, 15, 0.15); border: 1px solid #f1c40f; }
        .notice.error { background: rgba(233, 69, 96, 0.15); border: 1px solid #e94560; }

        article {
            margin-top: 32px;
            display: none;
        }

        article h2 {
            margin-bottom: 16px;
        }

        article .body {
            white-space: pre-wrap;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>📺 YouTube Blog Generator</h1>
        <p class="subtitle">Convert YouTube videos into well-structured blog posts effortlessly!</p>

        <form id="blog-form" class="input-row">
            <input id="video-url" type="text" placeholder="🎥 Enter YouTube video link" autocomplete="off">
            <button id="submit" type="submit">Generate Blog</button>
        </form>

        <div id="notice" class="notice"></div>

        <article id="result">
            <h2 id="result-title"></h2>
            <div id="result-body" class="body"></div>
        </article>
    </div>

    <script>
        const form = document.getElementById('blog-form');
        const input = document.getElementById('video-url');
        const button = document.getElementById('submit');
        const notice = document.getElementById('notice');
        const result = document.getElementById('result');

        function showNotice(kind, text) {
            notice.className = 'notice ' + kind;
            notice.textContent = text;
            notice.style.display = 'block';
        }

        form.addEventListener('submit', async (event) => {
            event.preventDefault();
            result.style.display = 'none';

            const videoUrl = input.value.trim();
            if (!videoUrl) {
                showNotice('warning', '⚠️ Please enter a valid YouTube link.');
                return;
            }

            button.disabled = true;
            showNotice('info', 'Fetching transcript and generating blog...');

            try {
                const response = await fetch('/api/blog', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ video_url: videoUrl })
                });
                const data = await response.json();

                if (!response.ok) {
                    showNotice('error', data.error || 'Blog generation failed.');
                    return;
                }

                notice.style.display = 'none';
                document.getElementById('result-title').textContent = '📚 ' + data.title;
                document.getElementById('result-body').textContent = data.body;
                result.style.display = 'block';
            } catch (err) {
                showNotice('error', 'Blog generation failed. Please try again later.');
            } finally {
                button.disabled = false;
            }
        });
    </script>
</body>
</html>
"###;
