use yew::prelude::*;

// Styles for the classes the effects toggle at runtime.
const DYNAMIC_STYLES: &str = r#"
    .error {
        border: 2px solid #ff6b6b !important;
        box-shadow: 0 0 0 3px rgba(255, 107, 107, 0.2) !important;
    }

    .valid {
        border: 2px solid #4CAF50 !important;
        box-shadow: 0 0 0 3px rgba(76, 175, 80, 0.2) !important;
    }

    .nav a.active {
        color: #667eea !important;
    }

    .nav a.active::after {
        width: 100% !important;
    }

    @media (max-width: 768px) {
        .mobile-menu {
            display: none;
            position: absolute;
            top: 100%;
            left: 0;
            right: 0;
            background: white;
            box-shadow: 0 2px 10px rgba(0,0,0,0.1);
            padding: 1rem;
        }

        .mobile-menu.active {
            display: block;
        }
    }
"#;

struct Card {
    id: &'static str,
    title: &'static str,
    summary: &'static str,
    body: &'static str,
}

const CHAPTERS: &[Card] = &[
    Card {
        id: "chapter-1-content",
        title: "Capítulo 1: A Luz",
        summary: "Entenda como a luz natural molda cada fotografia.",
        body: "Hora dourada, hora azul e luz dura do meio-dia: aprenda a ler o céu antes de levantar a câmera.",
    },
    Card {
        id: "chapter-2-content",
        title: "Capítulo 2: Composição",
        summary: "Regra dos terços, linhas guia e espaço negativo.",
        body: "Composição é decidir o que fica fora do quadro. Pratique com uma só lente durante uma semana.",
    },
    Card {
        id: "chapter-3-content",
        title: "Capítulo 3: Exposição",
        summary: "Abertura, velocidade e ISO trabalhando juntos.",
        body: "O triângulo da exposição explicado com exemplos de retrato, paisagem e rua.",
    },
    Card {
        id: "chapter-4-content",
        title: "Capítulo 4: Edição",
        summary: "Do arquivo RAW à imagem final.",
        body: "Um fluxo simples de revelação: balanço de branco, curvas e recorte, nesta ordem.",
    },
];

const RESOURCES: &[Card] = &[
    Card {
        id: "resource-1-content",
        title: "Lista de Equipamento",
        summary: "O mínimo para começar sem gastar demais.",
        body: "Uma câmera com modo manual, uma lente fixa de 35mm ou 50mm e um cartão de memória rápido.",
    },
    Card {
        id: "resource-2-content",
        title: "Exercícios Semanais",
        summary: "Desafios curtos para treinar o olhar.",
        body: "Cada semana um tema: sombras, reflexos, cores primárias, retratos de desconhecidos.",
    },
    Card {
        id: "resource-3-content",
        title: "Galeria de Referência",
        summary: "Fotógrafos para estudar.",
        body: "Uma seleção comentada de mestres da fotografia de rua, paisagem e retrato.",
    },
];

fn card_view(kind: &'static str, card: &Card) -> Html {
    let content_class = format!("{}-content", kind);
    html! {
        <div class={format!("{}-card", kind)}>
            <h3>{card.title}</h3>
            <p>{card.summary}</p>
            <div id={card.id} class={content_class} style="max-height: 0; overflow: hidden;">
                <p>{card.body}</p>
            </div>
            <button type="button" data-toggle={card.id}>{"Ler Mais"}</button>
        </div>
    }
}

#[function_component(Landing)]
pub fn landing() -> Html {
    html! {
        <>
            <style>{DYNAMIC_STYLES}</style>
            <nav class="nav">
                <div class="nav-content">
                    <a href="#intro" class="nav-logo">{"Guia de Fotografia"}</a>
                    <button type="button" class="mobile-menu-button">{"☰"}</button>
                    <div class="mobile-menu">
                        <a href="#intro">{"Início"}</a>
                        <a href="#chapters">{"Capítulos"}</a>
                        <a href="#resources">{"Recursos"}</a>
                        <a href="#contact">{"Contato"}</a>
                    </div>
                </div>
            </nav>

            <section class="hero">
                <h1>{"Aprenda a ver a luz"}</h1>
                <p class="hero-subtitle">{"Um guia prático de fotografia, do primeiro clique à edição final."}</p>
            </section>

            <section id="intro" class="section-intro">
                <h2>{"Sobre o guia"}</h2>
                <p>{"Quatro capítulos curtos e uma coleção de recursos para praticar no seu ritmo."}</p>
                <img class="lazy" data-src="/assets/cover.jpg" alt="Capa do guia" />
            </section>

            <section id="chapters">
                <h2>{"Capítulos"}</h2>
                <div class="chapters-grid">
                    { for CHAPTERS.iter().map(|chapter| card_view("chapter", chapter)) }
                </div>
            </section>

            <section id="resources">
                <h2>{"Recursos"}</h2>
                <div class="resources-grid">
                    { for RESOURCES.iter().map(|resource| card_view("resource", resource)) }
                </div>
            </section>

            <section id="contact" class="section-contact">
                <h2>{"Contato"}</h2>
                <form class="contact-form">
                    <div class="form-group">
                        <label for="name">{"Nome"}</label>
                        <input id="name" name="name" type="text" required=true />
                    </div>
                    <div class="form-group">
                        <label for="email">{"Email"}</label>
                        <input id="email" name="email" type="email" required=true />
                    </div>
                    <div class="form-group">
                        <label for="message">{"Mensagem"}</label>
                        <textarea id="message" name="message" rows="5" required=true />
                    </div>
                    <button type="submit">{"Enviar"}</button>
                </form>
            </section>
        </>
    }
}
