//! HTML for the upload page.

/// Upload form with inline result display. Posts the selected image to
/// `/upload_and_ocr` and renders the returned fields.
pub const UPLOAD_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Nameplate OCR</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/" class="logo">Nameplate OCR</a>
        </nav>
    </header>
    <main>
        <section id="upload-card">
            <h1>Read an instrument nameplate</h1>
            <p>Upload a photo of an instrument display or nameplate to
               extract the device name, serial number, and reading.</p>
            <form id="upload-form">
                <input type="file" id="image" name="image" accept="image/*">
                <button type="submit" class="btn">Upload &amp; OCR</button>
            </form>
            <div id="result" hidden>
                <h2>Result</h2>
                <dl>
                    <dt>Device name</dt><dd id="device-name"></dd>
                    <dt>Serial number</dt><dd id="serial-number"></dd>
                    <dt>Reading</dt><dd id="reading"></dd>
                </dl>
                <h2>Recognized text</h2>
                <pre id="extracted-text"></pre>
            </div>
            <div id="error" class="error" hidden></div>
        </section>
    </main>
    <script>
        const form = document.getElementById('upload-form');
        form.addEventListener('submit', async (e) => {
            e.preventDefault();
            const resultEl = document.getElementById('result');
            const errorEl = document.getElementById('error');
            resultEl.hidden = true;
            errorEl.hidden = true;

            const data = new FormData();
            const file = document.getElementById('image').files[0];
            if (file) {
                data.append('image', file);
            }

            try {
                const resp = await fetch('/upload_and_ocr', { method: 'POST', body: data });
                const json = await resp.json();
                if (json.error) {
                    errorEl.textContent = json.error;
                    errorEl.hidden = false;
                    return;
                }
                document.getElementById('device-name').textContent = json.device_name;
                document.getElementById('serial-number').textContent = json.serial_number;
                document.getElementById('reading').textContent = json.reading;
                document.getElementById('extracted-text').textContent = json.extracted_text;
                resultEl.hidden = false;
            } catch (err) {
                errorEl.textContent = 'Upload failed: ' + err;
                errorEl.hidden = false;
            }
        });
    </script>
</body>
</html>
"#;
