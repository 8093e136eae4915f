crate::define_id_enum! {
    /// Technology identifier. `Custom` covers modules registered outside this crate.
    ModuleId {
        Php => "php" : "PHP",
        JavaScript => "javascript" : "JavaScript",
        TypeScript => "typescript" : "TypeScript",
        Laravel => "laravel" : "Laravel",
        Statamic => "statamic" : "Statamic",
        Vue => "vue" : "Vue.js",
        React => "react" : "React",
        NextJs => "nextjs" : "Next.js",
        Nuxt => "nuxt" : "Nuxt",
        Livewire => "livewire" : "Livewire",
        Inertia => "inertia" : "Inertia.js",
        Filament => "filament" : "Filament",
        Pest => "pest" : "Pest",
        Tailwind => "tailwind" : "Tailwind CSS",
    }
}

crate::define_id_enum! {
    /// Ordering class for guideline output. Never consulted by detection or exclusion.
    PriorityType {
        MetaFramework => "meta-framework" : "Meta-framework",
        Framework => "framework" : "Framework",
        BaseLang => "base-lang" : "Base language",
        SpecializedLang => "specialized-lang" : "Specialized language",
        LaravelTool => "laravel-tool" : "Laravel tool",
        CssFramework => "css-framework" : "CSS framework",
    }
}

impl PriorityType {
    /// Position in the guideline order. Every unrecognised class shares the last slot.
    pub fn rank(&self) -> u8 {
        match self {
            PriorityType::MetaFramework => 0,
            PriorityType::Framework => 1,
            PriorityType::BaseLang => 2,
            PriorityType::SpecializedLang => 3,
            PriorityType::LaravelTool => 4,
            PriorityType::CssFramework => 5,
            PriorityType::Custom(_) => u8::MAX,
        }
    }
}
