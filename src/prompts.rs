//! Instruction payloads for the gate oracle and the entry generator.

pub fn typo_gate_prompt(normalized: &str) -> String {
    format!(
        "You are a strict \"dictionary entry gate\" for English search queries.\n\
         \n\
         Goal:\n\
         Decide whether the input should be allowed to proceed to dictionary entry generation.\n\
         \n\
         Rules:\n\
         - Do NOT explain meanings.\n\
         - Do NOT generate definitions or examples.\n\
         - Only decide the gate decision.\n\
         - Be strict: if any token looks like a misspelling of a common word, BLOCK.\n\
         - If you BLOCK, you may suggest up to 2 corrected candidates (common expressions only).\n\
         - If you cannot decide confidently, return UNCERTAIN (do not guess).\n\
         \n\
         Judgment hints:\n\
         - Repeated letters, minor edit distance, or unnatural tokens -> likely typo.\n\
         - If input contains a token that is not a plausible English word (e.g. \"headds\"), BLOCK.\n\
         - If input is a valid but unusual phrase and you are unsure, UNCERTAIN.\n\
         \n\
         Output JSON only with this schema:\n\
         {{\n\
           \"decision\": \"OK\" | \"BLOCK\" | \"UNCERTAIN\",\n\
           \"confidence\": \"high\" | \"medium\" | \"low\",\n\
           \"reason\": \"TYPO\" | \"GIBBERISH\" | \"NON_ENTRY\",\n\
           \"candidates\": [\"...\"]\n\
         }}\n\
         \n\
         Input: \"{normalized}\""
    )
}

pub fn word_entry_prompt(word: &str, max_senses: usize) -> String {
    format!(
        "For the English word \"{word}\", return JSON ONLY in the exact format below.\n\
         \n\
         All output must be in English.\n\
         Japanese is allowed ONLY in \"meaning\" and \"translation\".\n\
         \n\
         Sense rules:\n\
         - Up to {max_senses} senses, most common first.\n\
         - Each sense: one Japanese \"meaning\", the part(s) of speech, one natural\n\
           English \"example\", and its Japanese \"translation\".\n\
         - \"partOfSpeech\" is an array of standard English labels (noun, verb, ...).\n\
         \n\
         Etymology hook rules:\n\
         - Must be EXACTLY ONE sentence.\n\
         - No line breaks.\n\
         - No explanations or hedging.\n\
         - Prioritize memorability over academic accuracy.\n\
         \n\
         Choose ONE type:\n\
         Type A: prefix + root (+ suffix)\n\
         Type B: root-based hub (shared image)\n\
         Type C: origin-based (no clear segmentation)\n\
         Type D: pure image (no etymology)\n\
         \n\
         Return this JSON format:\n\
         \n\
         {{\n\
           \"pronunciation\": \"\",\n\
           \"senses\": [\n\
             {{\n\
               \"meaning\": \"\",\n\
               \"partOfSpeech\": [],\n\
               \"example\": \"\",\n\
               \"translation\": \"\"\n\
             }}\n\
           ],\n\
           \"etymologyHook\": {{\n\
             \"type\": \"A | B | C | D\",\n\
             \"text\": \"\"\n\
           }}\n\
         }}"
    )
}

pub fn lexical_unit_prompt(phrase: &str) -> String {
    format!(
        "You are generating a dictionary-style entry for an English lexical unit\n\
         for Japanese learners.\n\
         \n\
         This entry follows standard learner dictionary conventions\n\
         such as Google Dictionary and Oxford Learner's Dictionary.\n\
         \n\
         Input:\n\
         \"{phrase}\"\n\
         \n\
         Step 1: Classification\n\
         \n\
         Classify the expression into ONE of the following types:\n\
         - phrasal_verb\n\
         - idiom\n\
         - fixed_expression\n\
         - spoken_expression\n\
         - collocation\n\
         - pattern\n\
         \n\
         Verb + particle expressions are classified as phrasal_verb.\n\
         \n\
         Step 2: Core Image\n\
         \n\
         Write ONE core image that captures the shared conceptual essence\n\
         behind all meanings.\n\
         \n\
         Writing style for core image:\n\
         - Japanese\n\
         - Short noun phrase or abstract action phrase\n\
         - No sentence-ending punctuation\n\
         - Express transition, control, movement, or shift\n\
         - Independent from individual meanings\n\
         \n\
         Step 3: Meanings\n\
         \n\
         Write EXACTLY FOUR meanings.\n\
         \n\
         Each meaning corresponds to one category, used once:\n\
         \n\
         1. Physical action or movement\n\
         2. Change of physical or mental state\n\
         3. Change of situation or outcome\n\
         4. Social or interpersonal action\n\
         \n\
         For each meaning:\n\
         - Write a Japanese dictionary-style meaning\n\
         - End the meaning with a verb\n\
         - Use concise, neutral wording\n\
         - Provide one natural English example\n\
         - Provide a natural Japanese translation\n\
         \n\
         Output JSON only:\n\
         \n\
         {{\n\
           \"entry_type\": \"lexical_unit\",\n\
           \"lexical_unit_type\": \"phrasal_verb | idiom | fixed_expression | spoken_expression | collocation | pattern\",\n\
           \"coreImage\": {{\n\
             \"type\": \"core_image\",\n\
             \"text\": \"Japanese core image phrase\"\n\
           }},\n\
           \"meanings\": [\n\
             {{\n\
               \"id\": 1,\n\
               \"category\": \"physical | state | outcome | social\",\n\
               \"meaning\": \"Japanese verb-ended meaning\",\n\
               \"examples\": [\n\
                 {{\n\
                   \"sentence\": \"English example\",\n\
                   \"translation\": \"Japanese translation\"\n\
                 }}\n\
               ]\n\
             }}\n\
           ]\n\
         }}"
    )
}
