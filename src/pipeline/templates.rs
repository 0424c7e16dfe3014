//! Canned reply content (French).

/// Reply to the `go` command. Sent with the poster and product grid.
pub const PRESENTATION: &str = "Super!
Je suis Linky Bot de HealthLink (F Link).

C'est quoi HealthLink? Une solution pour vous aider à reprendre contrôle sur votre santé.
Savourez une tranquillité d'esprit hors du commun sachant que même lorsque vous êtes inconscients, votre carte ou votre bracelet peut parler pour vous.

Tout commence par la création de votre compte sur la plateforme https://gethealth.link/register, puis vous complétez vos informations de santé et enfin vous liez votre profil avec votre support HealthLink.

Vous pouvez commander votre bracelet/carte en nous écrivant sur https://wa.me/243892615790

Votre sécurité est notre priorité.";

/// Body following the salutation for bare greetings.
pub const GREETING_MENU: &str = "Je suis Linky Bot de HealthLink (F Link).

Posez-moi une question sur HealthLink et je vous renseignerai!
Vous pouvez me demander:
- Qu'est-ce que HealthLink? https://wa.me/243831218743?text=Qu'est-ce%20que%20HealthLink%3F
- Comment commander? https://wa.me/243831218743?text=Comment%20commander%3F
- Comment créer un compte? https://wa.me/243831218743?text=Comment%20cr%C3%A9er%20un%20compte%3F
- Fonctionnalités https://wa.me/243831218743?text=Fonctionnalit%C3%A9s
- Tarifs https://wa.me/243831218743?text=Tarifs
- etc.

Tapez \"go\" pour une présentation complète.";

/// Body following the salutation when no answer was found.
pub const QUESTION_FALLBACK: &str = "Je suis Linky Bot de HealthLink (F Link)
Merci pour votre message.
Je peux vous aider à comprendre ce qu'est HealthLink et comment l'utiliser.

HealthLink est votre carnet médical numérique qui vous suit partout via un bracelet ou une carte.
Vos informations médicales (allergies, groupe sanguin, médicaments, etc.) sont accessibles en urgence grâce à un QR code.

Tout commence par la création de votre compte sur https://gethealth.link/register
Vous pouvez commander votre bracelet/carte en écrivant sur https://wa.me/243892615790

Votre sécurité est notre priorité.";

/// Reply to a short thank-you.
pub const THANKS_ACK: &str =
    "De rien! N'hésitez pas à me contacter si vous avez d'autres questions.";

/// Media file names inside the media directory.
pub const POSTER_FILE: &str = "product-poster-min-fr.jpg";
pub const GRID_FILE: &str = "product_grid.jpg";
