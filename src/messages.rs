//! Bilingual (Persian / English) reply texts. All of them are raw text and
//! must go through `escape_markdown` before they are sent.

const SEPARATOR: &str = "\n\n------------------------------\n\n";

pub fn welcome() -> String {
    [
        "🎉 *به ربات QR کد خوش اومدی!* 🤖\n\n\
         من می‌تونم:\n\
         1️⃣ متن یا لینکتو به QR کد تبدیل کنم.\n\
         2️⃣ محتوای QR کد رو از عکست بخونم.\n\n\
         فقط کافیه یه متن، لینک یا عکس QR کد برام بفرستی! 😊",
        "🎉 *Welcome to QR Code Bot!* 🤖\n\n\
         I can:\n\
         1️⃣ Convert your text or link to a QR code.\n\
         2️⃣ Read QR code content from your image.\n\n\
         Just send me a text, link, or QR code image! 😊",
    ]
    .join(SEPARATOR)
}

pub fn qr_found() -> String {
    [
        "📸 *محتوای QR کدت پیدا شد!* 🎉\n\n\
         این چیزیه که توی QR کد نوشته شده:",
        "📸 *QR Code Content Found!* 🎉\n\n\
         Here’s what’s in the QR code:",
    ]
    .join(SEPARATOR)
}

/// Apology for a photo that could not be decoded; `error` is appended verbatim.
pub fn photo_failed(max_image_mb: u64, error: &str) -> String {
    let fa = format!(
        "❌ *اوپس! یه مشکلی پیش اومد* 😓\n\n\
         نتونستم محتوای QR کد رو بخونم. لطفاً این موارد رو چک کن:\n\
         📌 تصویرت باید توی فرمت PNG، JPEG یا WebP باشه.\n\
         📌 حجم تصویرت باید کمتر از {max_image_mb} مگابایت باشه.\n\
         📌 QR کد باید کامل و واضح باشه (زیاد برش نخورده باشه، تار نباشه یا کیفیتش پایین نباشه).\n\
         💡 اگه عکست تاره، لطفاً یه نسخه باکیفیت‌تر بفرست."
    );
    let en = format!(
        "❌ *Oops! Something went wrong* 😓\n\n\
         I couldn’t read the QR code. Please check these:\n\
         📌 The image must be in PNG, JPEG, or WebP format.\n\
         📌 The image size must be under {max_image_mb}MB.\n\
         📌 The QR code must be complete and clear (not overly cropped, blurry, or low quality).\n\
         💡 If the image is blurry, please send a higher-quality version.\n\n\
         Error: {error}"
    );
    [fa, en].join(SEPARATOR)
}

pub fn empty_text() -> String {
    [
        "❌ *یه متن یا لینک درست بفرست!* 😅\n\n\
         متنی که فرستادی خالیه.",
        "❌ *Please send a proper text or link!* 😅\n\n\
         The text you sent is empty.",
    ]
    .join(SEPARATOR)
}

pub fn text_too_long(max_chars: usize) -> String {
    [
        format!(
            "❌ *متنت خیلی طولانیه!* 📏\n\n\
             لطفاً متنی کوتاه‌تر از {max_chars} کاراکتر بفرست."
        ),
        format!(
            "❌ *Your text is too long!* 📏\n\n\
             Please send a text shorter than {max_chars} characters."
        ),
    ]
    .join(SEPARATOR)
}

pub fn invalid_url() -> String {
    [
        "❌ *لینک معتبر نیست!* 🔗\n\n\
         لطفاً یه آدرس اینترنتی درست بفرست.",
        "❌ *Invalid URL!* 🔗\n\n\
         Please send a valid URL.",
    ]
    .join(SEPARATOR)
}

pub fn qr_ready() -> String {
    [
        "📷 *QR کدت آماده شد!* 🎉\n\n\
         این QR کد برای متن یا لینکت ساخته شد.",
        "📷 *Your QR code is ready!* 🎉\n\n\
         This QR code was created for your text or link.",
    ]
    .join(SEPARATOR)
}

pub fn encode_failed() -> String {
    [
        "❌ *اوپس! مشکلی پیش اومد* 😓\n\n\
         نتونستم QR کد رو بسازم. لطفاً دوباره امتحان کن یا یه متن کوتاه‌تر بفرست.",
        "❌ *Oops! Something went wrong* 😓\n\n\
         I couldn’t create the QR code. Please try again or send a shorter text.",
    ]
    .join(SEPARATOR)
}
